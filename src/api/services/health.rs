use std::time::Instant;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

use super::helpers::json_response;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStorageCheck {
    pub status: &'static str,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}

/// Health Service
///
/// 直接调用 storage，不经过业务服务；只查 count，不加载数据。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(storage: web::Data<SeaOrmStorage>) -> HttpResponse {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = storage.get_backend_name().to_string();

        let storage_status = match storage.count().await {
            Ok(count) => HealthStorageCheck {
                status: "healthy",
                backend,
                links_count: Some(count),
                error: None,
            },
            Err(e) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy",
                    backend,
                    links_count: None,
                    error: Some(e.format_simple()),
                }
            }
        };

        let is_healthy = storage_status.error.is_none();
        let body = HealthResponse {
            status: storage_status.status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            storage: storage_status,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        json_response(status, &body)
    }
}
