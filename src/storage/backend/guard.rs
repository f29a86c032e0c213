//! 存储操作保护
//!
//! 每次存储调用都有超时上限，并把驱动错误归类为领域错误：
//! 唯一约束冲突 → `Conflict`，超时 → `Timeout`，其余 → `StoreUnavailable`。
//! 这里不做自动重试，失败直接交给调用方。

use std::future::Future;
use std::time::Duration;

use sea_orm::{DbErr, SqlErr};
use tracing::{debug, warn};

use crate::errors::TinyhopError;

/// 判断数据库错误是否为唯一约束冲突
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    // 回退到字符串匹配（驱动未给出结构化错误码时）
    is_unique_violation_message(&err.to_string().to_lowercase())
}

fn is_unique_violation_message(err_str: &str) -> bool {
    err_str.contains("unique constraint failed")
        || err_str.contains("duplicate entry")
        || err_str.contains("duplicate key value")
}

/// 将 DbErr 归类为领域错误
pub fn classify_db_error(operation_name: &str, err: DbErr) -> TinyhopError {
    if is_unique_violation(&err) {
        debug!("Operation '{}' hit a unique constraint", operation_name);
        return TinyhopError::conflict(format!("{}: {}", operation_name, err));
    }

    warn!("Operation '{}' failed: {}", operation_name, err);
    TinyhopError::store_unavailable(format!("{} failed: {}", operation_name, err))
}

/// 带超时的执行器
///
/// 超时后 future 被丢弃；未提交的事务随之回滚。
pub async fn with_timeout<T, Fut>(
    operation_name: &str,
    timeout: Duration,
    operation: Fut,
) -> Result<T, TinyhopError>
where
    Fut: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(classify_db_error(operation_name, e)),
        Err(_elapsed) => {
            warn!(
                "Operation '{}' timed out after {}ms",
                operation_name,
                timeout.as_millis()
            );
            Err(TinyhopError::timeout(format!(
                "Operation '{}' timed out after {}ms",
                operation_name,
                timeout.as_millis()
            )))
        }
    }
}
