//! SeaORM storage backend
//!
//! Durable home of both tables: `links` (LinkStore) and `access_records`
//! (AccessLog). Supports SQLite, MySQL/MariaDB and PostgreSQL.

mod connection;
mod converters;
pub mod guard;
mod mutations;
mod query;

use std::future::Future;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{Result, TinyhopError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_mapping, new_mapping_to_active_model, record_model_to_access_record};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(TinyhopError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    operation_timeout: Duration,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(TinyhopError::database_config("database_url is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.database_url, config.pool_size).await?
        } else {
            connect_generic(&config.database_url, backend_name, config.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            operation_timeout: Duration::from_millis(config.operation_timeout_ms),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn get_backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（关闭时使用）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the pool. Further calls on any clone fail with `StoreUnavailable`.
    pub async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| TinyhopError::store_unavailable(format!("Failed to close database: {}", e)))?;
        info!("{} storage closed", self.backend_name.to_uppercase());
        Ok(())
    }

    /// 所有存储操作统一走超时保护和错误分类
    async fn guarded<T, Fut>(&self, operation_name: &str, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = std::result::Result<T, DbErr>>,
    {
        guard::with_timeout(operation_name, self.operation_timeout, operation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("tinyhop.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("sqlite:///tmp/links.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("mariadb://user@host/db").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://user@host/db").unwrap(),
            "postgres"
        );
        assert!(matches!(
            infer_backend_from_url("redis://localhost"),
            Err(TinyhopError::DatabaseConfig(_))
        ));
    }
}
