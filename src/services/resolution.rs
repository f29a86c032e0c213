//! Token resolution
//!
//! Found → NotExpired → Authorized → Logged. Each failed step has its own
//! error so callers can tell an unknown token from a lapsed one from a
//! locked one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::errors::{Result, TinyhopError};
use crate::storage::{Mapping, SeaOrmStorage};
use super::link_service::validate_destination;
use crate::utils::password::verify_password;

#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub token: String,
    pub password: Option<String>,
    pub caller_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub destination: String,
    /// false 表示跳转成功但访问记录写入失败
    pub access_recorded: bool,
}

pub struct ResolutionEngine {
    storage: Arc<SeaOrmStorage>,
}

impl ResolutionEngine {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn resolve(&self, req: ResolveRequest) -> Result<Resolution> {
        self.resolve_at(req, Utc::now()).await
    }

    pub async fn resolve_at(&self, req: ResolveRequest, now: DateTime<Utc>) -> Result<Resolution> {
        let mapping = self.storage.lookup(&req.token).await?;

        if mapping.is_expired_at(now) {
            debug!("Link '{}' expired at {}", mapping.token, mapping.expires_at);
            return Err(TinyhopError::expired(format!(
                "Link '{}' expired at {}",
                mapping.token,
                mapping.expires_at.to_rfc3339()
            )));
        }

        self.authorize(&mapping, req.password).await?;

        // 库里的目标地址放不进 Location 头时，不记访问直接报错
        if validate_destination(&mapping.destination).is_err() {
            error!("Stored destination for '{}' is not redirectable", mapping.token);
            return Err(TinyhopError::corrupt_record(format!(
                "Link '{}' has an unusable destination",
                mapping.token
            )));
        }

        // 访问记录失败只影响统计，不影响跳转
        let access_recorded = match self
            .storage
            .record_access(&mapping.token, now, &req.caller_address)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(
                    "Failed to record access for '{}' from {}: {}",
                    mapping.token, req.caller_address, e
                );
                false
            }
        };

        Ok(Resolution {
            destination: mapping.destination,
            access_recorded,
        })
    }

    async fn authorize(&self, mapping: &Mapping, password: Option<String>) -> Result<()> {
        let Some(hash) = mapping.password_hash.clone() else {
            return Ok(());
        };

        let Some(password) = password.filter(|p| !p.is_empty()) else {
            return Err(TinyhopError::unauthorized(format!(
                "Link '{}' requires a password",
                mapping.token
            )));
        };

        // Argon2 是 CPU 密集操作，挪到阻塞线程池
        let matched = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| TinyhopError::password_hash(format!("Password check aborted: {}", e)))?
            .map_err(|e| {
                error!("Stored password hash for '{}' is unusable: {}", mapping.token, e);
                TinyhopError::from(e)
            })?;

        if matched {
            Ok(())
        } else {
            Err(TinyhopError::unauthorized(format!(
                "Incorrect password for link '{}'",
                mapping.token
            )))
        }
    }
}
