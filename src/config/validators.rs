//! Startup validation for [`StaticConfig`](super::StaticConfig)

use super::StaticConfig;
use crate::errors::{Result, TinyhopError};

pub const MIN_TOKEN_LENGTH: usize = 6;
pub const MAX_TOKEN_LENGTH: usize = 12;

/// 校验启动配置，返回第一个发现的问题
pub fn validate_config(config: &StaticConfig) -> Result<()> {
    let links = &config.links;

    if links.base_url.trim().is_empty() {
        return Err(TinyhopError::validation("links.base_url must not be empty"));
    }

    if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&links.token_length) {
        return Err(TinyhopError::validation(format!(
            "links.token_length must be between {} and {}, got {}",
            MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH, links.token_length
        )));
    }

    if links.token_max_attempts == 0 {
        return Err(TinyhopError::validation(
            "links.token_max_attempts must be at least 1",
        ));
    }

    if links.default_ttl_hours <= 0 || links.max_ttl_hours <= 0 {
        return Err(TinyhopError::validation("link TTLs must be positive"));
    }

    if links.default_ttl_hours > links.max_ttl_hours {
        return Err(TinyhopError::validation(format!(
            "links.default_ttl_hours ({}) exceeds links.max_ttl_hours ({})",
            links.default_ttl_hours, links.max_ttl_hours
        )));
    }

    if config.database.operation_timeout_ms == 0 {
        return Err(TinyhopError::validation(
            "database.operation_timeout_ms must be positive",
        ));
    }

    if !["text", "json"].contains(&config.logging.format.as_str()) {
        return Err(TinyhopError::validation(format!(
            "logging.format must be 'text' or 'json', got '{}'",
            config.logging.format
        )));
    }

    Ok(())
}
