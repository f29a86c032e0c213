//! Per-link analytics
//!
//! Read-only composition of the link row and its access records. Works on
//! expired links too.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;
use crate::storage::{AccessRecord, SeaOrmStorage};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub token: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
    pub password_protected: bool,
    pub access_count: u64,
    /// 按访问时间正序
    pub access_records: Vec<AccessRecord>,
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_analytics(&self, token: &str) -> Result<LinkAnalytics> {
        self.get_analytics_at(token, Utc::now()).await
    }

    pub async fn get_analytics_at(&self, token: &str, now: DateTime<Utc>) -> Result<LinkAnalytics> {
        let mapping = self.storage.read_analytics(token).await?;
        let access_records = self.storage.read_all(token).await?;

        Ok(LinkAnalytics {
            expired: mapping.is_expired_at(now),
            password_protected: mapping.is_password_protected(),
            token: mapping.token,
            destination: mapping.destination,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
            access_count: mapping.access_count,
            access_records,
        })
    }
}
