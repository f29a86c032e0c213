//! GET /analytics/{token}

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::services::AnalyticsService;

use super::helpers::api_result;

pub struct AnalyticsHandler;

impl AnalyticsHandler {
    pub async fn get_link_analytics(
        path: web::Path<String>,
        analytics: web::Data<AnalyticsService>,
    ) -> HttpResponse {
        let token = path.into_inner();
        api_result(StatusCode::OK, analytics.get_analytics(&token).await)
    }
}
