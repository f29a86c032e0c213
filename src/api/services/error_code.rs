//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::TinyhopError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,
    GatewayTimeout = 1031,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkInvalidDestination = 3002,
    LinkPasswordHashError = 3004,
    LinkDatabaseError = 3005,
    LinkExpired = 3007,
    LinkPasswordRejected = 3008,
    TokenSpaceExhausted = 3009,
    LinkCorrupted = 3010,
}

impl From<&TinyhopError> for ErrorCode {
    fn from(err: &TinyhopError) -> Self {
        match err {
            TinyhopError::Validation(_) => ErrorCode::LinkInvalidDestination,
            TinyhopError::NotFound(_) => ErrorCode::LinkNotFound,
            TinyhopError::Expired(_) => ErrorCode::LinkExpired,
            TinyhopError::Unauthorized(_) => ErrorCode::LinkPasswordRejected,
            TinyhopError::TokenSpaceExhausted(_) => ErrorCode::TokenSpaceExhausted,
            TinyhopError::PasswordHash(_) => ErrorCode::LinkPasswordHashError,
            TinyhopError::StoreUnavailable(_) | TinyhopError::DatabaseConnection(_) => {
                ErrorCode::ServiceUnavailable
            }
            TinyhopError::Timeout(_) => ErrorCode::GatewayTimeout,
            TinyhopError::Conflict(_) | TinyhopError::DatabaseConfig(_) => {
                ErrorCode::LinkDatabaseError
            }
            TinyhopError::CorruptRecord(_) => ErrorCode::LinkCorrupted,
            TinyhopError::Serialization(_) | TinyhopError::FileOperation(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
