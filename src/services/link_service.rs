//! Link creation service
//!
//! Owns the `shorten` operation: input validation, TTL arithmetic,
//! password hashing and the token claim loop.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use super::token::TokenGenerator;
use crate::config::LinksConfig;
use crate::errors::{Result, TinyhopError};
use crate::storage::{NewMapping, SeaOrmStorage};
use crate::utils::password::process_new_password;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct ShortenRequest {
    pub destination: String,
    /// None = `links.default_ttl_hours`，允许小数（1.5 = 90 分钟）
    pub ttl_hours: Option<f64>,
    /// None or empty = public link
    pub password: Option<String>,
}

/// Result of link creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedLink {
    pub token: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    tokens: TokenGenerator,
    base_url: String,
    default_ttl_hours: i64,
    max_ttl_hours: i64,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, tokens: TokenGenerator, config: &LinksConfig) -> Self {
        Self {
            storage,
            tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_ttl_hours: config.default_ttl_hours,
            max_ttl_hours: config.max_ttl_hours,
        }
    }

    /// `base_url` 与 token 之间恰好一个 `/`
    pub fn short_url_for(&self, token: &str) -> String {
        format!("{}/{}", self.base_url, token)
    }

    pub async fn shorten(&self, req: ShortenRequest) -> Result<ShortenedLink> {
        self.shorten_at(req, Utc::now()).await
    }

    /// Create a link as of `now`. Every call yields a new token.
    pub async fn shorten_at(&self, req: ShortenRequest, now: DateTime<Utc>) -> Result<ShortenedLink> {
        let destination = validate_destination(&req.destination)?;
        let expires_at = self.expiry_for(req.ttl_hours, now)?;

        let password_hash = hash_new_password(req.password).await?;

        let storage = &self.storage;
        let mapping = self
            .tokens
            .issue(|token| {
                let new = NewMapping {
                    token,
                    destination: destination.clone(),
                    created_at: now,
                    expires_at,
                    password_hash: password_hash.clone(),
                };
                async move { storage.insert(new).await }
            })
            .await?;

        info!(
            "LinkService: created '{}' -> '{}' (expires {})",
            mapping.token,
            mapping.destination,
            mapping.expires_at.to_rfc3339()
        );

        Ok(ShortenedLink {
            short_url: self.short_url_for(&mapping.token),
            token: mapping.token,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
        })
    }

    fn expiry_for(&self, ttl_hours: Option<f64>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let ttl_hours = ttl_hours.unwrap_or(self.default_ttl_hours as f64);

        if !ttl_hours.is_finite() || ttl_hours <= 0.0 {
            return Err(TinyhopError::validation(format!(
                "ttlHours must be positive, got {}",
                ttl_hours
            )));
        }
        if ttl_hours > self.max_ttl_hours as f64 {
            return Err(TinyhopError::validation(format!(
                "ttlHours must not exceed {}, got {}",
                self.max_ttl_hours, ttl_hours
            )));
        }

        // 精确到毫秒
        let millis = (ttl_hours * MILLIS_PER_HOUR).round();
        if millis < 1.0 || millis >= i64::MAX as f64 {
            return Err(TinyhopError::validation(format!(
                "ttlHours {} is out of range",
                ttl_hours
            )));
        }

        Duration::try_milliseconds(millis as i64)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| TinyhopError::validation(format!("ttlHours {} is out of range", ttl_hours)))
    }
}

/// 空串视为无密码；Argon2 哈希放到阻塞线程池，不占 worker
async fn hash_new_password(password: Option<String>) -> Result<Option<String>> {
    tokio::task::spawn_blocking(move || process_new_password(password.as_deref()))
        .await
        .map_err(|e| TinyhopError::password_hash(format!("Password hashing aborted: {}", e)))?
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            TinyhopError::from(e)
        })
}

/// 去掉首尾空白；空串和控制字符（无法放进 Location 头）拒绝
pub fn validate_destination(raw: &str) -> Result<String> {
    let destination = raw.trim();

    if destination.is_empty() {
        return Err(TinyhopError::validation("destination is required"));
    }
    if destination.chars().any(char::is_control) {
        return Err(TinyhopError::validation(
            "destination must not contain control characters",
        ));
    }

    Ok(destination.to_string())
}
