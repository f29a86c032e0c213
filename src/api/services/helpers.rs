//! HTTP 响应帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::TinyhopError;

use super::error_code::ErrorCode;

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ApiError<'a> {
    pub code: ErrorCode,
    pub error: &'a str,
    pub message: &'a str,
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 从 TinyhopError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_response(err: &TinyhopError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        debug!("Request rejected: {}", err);
    }

    json_response(
        status,
        &ApiError {
            code: ErrorCode::from(err),
            error: err.error_type(),
            message: err.message(),
        },
    )
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(status: StatusCode, result: Result<T, TinyhopError>) -> HttpResponse {
    match result {
        Ok(data) => json_response(status, &data),
        Err(e) => error_response(&e),
    }
}

/// JSON 请求体解析失败时返回 400 + 统一错误体
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            let response = error_response(&TinyhopError::validation(format!(
                "Invalid JSON body: {}",
                err
            )));
            error::InternalError::from_response(err, response).into()
        })
}

/// 未匹配任何路由
pub async fn not_found_fallback() -> HttpResponse {
    error_response(&TinyhopError::not_found("No such route"))
}
