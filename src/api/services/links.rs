//! POST /links

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::services::{LinkService, ShortenRequest, ShortenedLink};

use super::helpers::api_result;

/// 请求体，兼容旧字段名 `original_url` / `expiration_hours`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkBody {
    #[serde(default, alias = "original_url")]
    pub destination: String,
    #[serde(default, alias = "expiration_hours")]
    pub ttl_hours: Option<f64>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub short_url: String,
    pub token: String,
    pub created_at: String,
    pub expires_at: String,
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, false)
}

impl From<ShortenedLink> for CreateLinkResponse {
    fn from(link: ShortenedLink) -> Self {
        Self {
            short_url: link.short_url,
            token: link.token,
            created_at: rfc3339(link.created_at),
            expires_at: rfc3339(link.expires_at),
        }
    }
}

pub struct LinksService;

impl LinksService {
    pub async fn create_link(
        body: web::Json<CreateLinkBody>,
        links: web::Data<LinkService>,
    ) -> HttpResponse {
        let body = body.into_inner();
        trace!("Create link request for '{}'", body.destination);

        let result = links
            .shorten(ShortenRequest {
                destination: body.destination,
                ttl_hours: body.ttl_hours,
                password: body.password,
            })
            .await
            .map(CreateLinkResponse::from);

        api_result(StatusCode::CREATED, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_accepts_legacy_field_names() {
        let body: CreateLinkBody =
            serde_json::from_str(r#"{"original_url":"https://a.b","expiration_hours":3}"#).unwrap();
        assert_eq!(body.destination, "https://a.b");
        assert_eq!(body.ttl_hours, Some(3.0));
        assert!(body.password.is_none());
    }

    #[test]
    fn test_body_camel_case() {
        let body: CreateLinkBody = serde_json::from_str(
            r#"{"destination":"https://a.b","ttlHours":1,"password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(body.ttl_hours, Some(1.0));
        assert_eq!(body.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_body_accepts_fractional_hours() {
        let body: CreateLinkBody =
            serde_json::from_str(r#"{"destination":"https://a.b","ttlHours":1.5}"#).unwrap();
        assert_eq!(body.ttl_hours, Some(1.5));
    }

    #[test]
    fn test_timestamps_carry_offset() {
        let ts = DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(rfc3339(ts), "2025-06-01T10:00:00.000+00:00");
    }
}
