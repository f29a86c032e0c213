//! GET|HEAD /{token}

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue, LOCATION};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::errors::TinyhopError;
use crate::services::{ResolutionEngine, ResolveRequest};
use crate::utils::ip::{TrustedProxies, extract_caller_address};

use super::helpers::error_response;

/// 访问记录写入失败时附带此响应头
pub const ACCESS_RECORDED_HEADER: &str = "x-access-recorded";

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub password: Option<String>,
}

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        query: web::Query<RedirectQuery>,
        engine: web::Data<ResolutionEngine>,
        trusted_proxies: web::Data<TrustedProxies>,
    ) -> HttpResponse {
        let token = path.into_inner();
        let caller_address = extract_caller_address(&req, &trusted_proxies);
        trace!("Resolving '{}' for {}", token, caller_address);

        let request = ResolveRequest {
            token,
            password: query.into_inner().password,
            caller_address,
        };

        match engine.resolve(request).await {
            Ok(resolution) => {
                let Ok(location) = HeaderValue::from_bytes(resolution.destination.as_bytes())
                else {
                    return error_response(&TinyhopError::corrupt_record(
                        "Stored destination cannot be used as a Location header",
                    ));
                };

                let mut response = HttpResponse::build(StatusCode::FOUND);
                response
                    .insert_header((LOCATION, location))
                    .insert_header((CACHE_CONTROL, "no-store"));

                if !resolution.access_recorded {
                    debug!("Redirecting without an access record");
                    response.insert_header((ACCESS_RECORDED_HEADER, "false"));
                }

                response.finish()
            }
            Err(e) => error_response(&e),
        }
    }
}
