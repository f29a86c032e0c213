//! HTTP surface

pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::config::StaticConfig;
use crate::services::{AnalyticsService, LinkService, ResolutionEngine, TokenGenerator};
use crate::storage::SeaOrmStorage;
use crate::utils::ip::TrustedProxies;

/// 请求处理器共享的依赖，启动时构建一次
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub link_service: Arc<LinkService>,
    pub resolution: Arc<ResolutionEngine>,
    pub analytics: Arc<AnalyticsService>,
    pub trusted_proxies: Arc<TrustedProxies>,
}

impl AppState {
    pub fn new(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        Self::with_token_generator(storage, config, TokenGenerator::from_config(&config.links))
    }

    pub fn with_token_generator(
        storage: Arc<SeaOrmStorage>,
        config: &StaticConfig,
        tokens: TokenGenerator,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(storage.clone(), tokens, &config.links)),
            resolution: Arc::new(ResolutionEngine::new(storage.clone())),
            analytics: Arc::new(AnalyticsService::new(storage.clone())),
            trusted_proxies: Arc::new(TrustedProxies::new(config.server.trusted_proxies.clone())),
            storage,
        }
    }

    /// 注入 app data 并注册路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.storage.clone()))
            .app_data(web::Data::from(self.link_service.clone()))
            .app_data(web::Data::from(self.resolution.clone()))
            .app_data(web::Data::from(self.analytics.clone()))
            .app_data(web::Data::from(self.trusted_proxies.clone()));
        services::app_routes(cfg);
    }
}
