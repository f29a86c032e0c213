//! Shared setup for integration tests
//!
//! Each test gets its own SQLite file inside a TempDir so tests can run in
//! parallel without sharing rows.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use tinyhop::config::{DatabaseConfig, StaticConfig};
use tinyhop::storage::{NewMapping, SeaOrmStorage, StorageFactory};

pub const BASE_URL: &str = "https://t.hop";

pub struct TestStore {
    pub storage: Arc<SeaOrmStorage>,
    // 保持目录存活直到测试结束
    _dir: TempDir,
}

pub async fn test_store() -> TestStore {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("tinyhop_test.db");

    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        pool_size: 8,
        operation_timeout_ms: 5000,
    };

    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");

    TestStore { storage, _dir: dir }
}

pub fn test_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.links.base_url = BASE_URL.to_string();
    config
}

/// 固定的整秒时间，便于和数据库读回的值比较
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, second)
        .single()
        .expect("valid timestamp")
}

pub fn new_mapping(token: &str, created_at: DateTime<Utc>, ttl_hours: i64) -> NewMapping {
    NewMapping {
        token: token.to_string(),
        destination: format!("https://example.com/{}", token),
        created_at,
        expires_at: created_at + chrono::Duration::hours(ttl_hours),
        password_hash: None,
    }
}
