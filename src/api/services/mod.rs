pub mod analytics;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod links;
pub mod redirect;

use actix_web::web;

pub use analytics::AnalyticsHandler;
pub use error_code::ErrorCode;
pub use health::HealthService;
pub use links::LinksService;
pub use redirect::RedirectService;

/// 注册全部路由
///
/// 固定前缀（`/health`、`/links`、`/analytics`）先于 `/{token}` 注册。
pub fn app_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(helpers::json_config())
        .route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check))
        .route("/links", web::post().to(LinksService::create_link))
        .route(
            "/analytics/{token}",
            web::get().to(AnalyticsHandler::get_link_analytics),
        )
        .route("/{token}", web::get().to(RedirectService::handle_redirect))
        .route("/{token}", web::head().to(RedirectService::handle_redirect))
        .default_service(web::to(helpers::not_found_fallback));
}
