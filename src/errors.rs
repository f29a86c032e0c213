use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinyhopError {
    Validation(String),
    NotFound(String),
    Expired(String),
    Unauthorized(String),
    Conflict(String),
    TokenSpaceExhausted(String),
    StoreUnavailable(String),
    Timeout(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    PasswordHash(String),
    Serialization(String),
    FileOperation(String),
    CorruptRecord(String),
}

impl TinyhopError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TinyhopError::Validation(_) => "E001",
            TinyhopError::NotFound(_) => "E002",
            TinyhopError::Expired(_) => "E003",
            TinyhopError::Unauthorized(_) => "E004",
            TinyhopError::Conflict(_) => "E005",
            TinyhopError::TokenSpaceExhausted(_) => "E006",
            TinyhopError::StoreUnavailable(_) => "E007",
            TinyhopError::Timeout(_) => "E008",
            TinyhopError::DatabaseConfig(_) => "E009",
            TinyhopError::DatabaseConnection(_) => "E010",
            TinyhopError::PasswordHash(_) => "E011",
            TinyhopError::Serialization(_) => "E012",
            TinyhopError::FileOperation(_) => "E013",
            TinyhopError::CorruptRecord(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TinyhopError::Validation(_) => "Validation Error",
            TinyhopError::NotFound(_) => "Link Not Found",
            TinyhopError::Expired(_) => "Link Expired",
            TinyhopError::Unauthorized(_) => "Unauthorized",
            TinyhopError::Conflict(_) => "Token Conflict",
            TinyhopError::TokenSpaceExhausted(_) => "Token Space Exhausted",
            TinyhopError::StoreUnavailable(_) => "Store Unavailable",
            TinyhopError::Timeout(_) => "Store Timeout",
            TinyhopError::DatabaseConfig(_) => "Database Configuration Error",
            TinyhopError::DatabaseConnection(_) => "Database Connection Error",
            TinyhopError::PasswordHash(_) => "Password Hash Error",
            TinyhopError::Serialization(_) => "Serialization Error",
            TinyhopError::FileOperation(_) => "File Operation Error",
            TinyhopError::CorruptRecord(_) => "Corrupt Record",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TinyhopError::Validation(msg)
            | TinyhopError::NotFound(msg)
            | TinyhopError::Expired(msg)
            | TinyhopError::Unauthorized(msg)
            | TinyhopError::Conflict(msg)
            | TinyhopError::TokenSpaceExhausted(msg)
            | TinyhopError::StoreUnavailable(msg)
            | TinyhopError::Timeout(msg)
            | TinyhopError::DatabaseConfig(msg)
            | TinyhopError::DatabaseConnection(msg)
            | TinyhopError::PasswordHash(msg)
            | TinyhopError::Serialization(msg)
            | TinyhopError::FileOperation(msg)
            | TinyhopError::CorruptRecord(msg) => msg,
        }
    }

    /// HTTP 状态码映射，每种对外错误对应唯一状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            TinyhopError::Validation(_) => StatusCode::BAD_REQUEST,
            TinyhopError::Unauthorized(_) => StatusCode::FORBIDDEN,
            TinyhopError::NotFound(_) => StatusCode::NOT_FOUND,
            TinyhopError::Expired(_) => StatusCode::GONE,
            TinyhopError::StoreUnavailable(_) | TinyhopError::DatabaseConnection(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            TinyhopError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            TinyhopError::Conflict(_)
            | TinyhopError::TokenSpaceExhausted(_)
            | TinyhopError::DatabaseConfig(_)
            | TinyhopError::PasswordHash(_)
            | TinyhopError::Serialization(_)
            | TinyhopError::FileOperation(_)
            | TinyhopError::CorruptRecord(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TinyhopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TinyhopError {}

// 便捷的构造函数
impl TinyhopError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TinyhopError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TinyhopError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        TinyhopError::Expired(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        TinyhopError::Unauthorized(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        TinyhopError::Conflict(msg.into())
    }

    pub fn token_space_exhausted<T: Into<String>>(msg: T) -> Self {
        TinyhopError::TokenSpaceExhausted(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        TinyhopError::StoreUnavailable(msg.into())
    }

    pub fn timeout<T: Into<String>>(msg: T) -> Self {
        TinyhopError::Timeout(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TinyhopError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TinyhopError::DatabaseConnection(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        TinyhopError::PasswordHash(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TinyhopError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TinyhopError::FileOperation(msg.into())
    }

    pub fn corrupt_record<T: Into<String>>(msg: T) -> Self {
        TinyhopError::CorruptRecord(msg.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, TinyhopError::Conflict(_))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TinyhopError {
    fn from(err: sea_orm::DbErr) -> Self {
        TinyhopError::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for TinyhopError {
    fn from(err: std::io::Error) -> Self {
        TinyhopError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TinyhopError {
    fn from(err: serde_json::Error) -> Self {
        TinyhopError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TinyhopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_failures_have_distinct_statuses() {
        let statuses = [
            TinyhopError::not_found("x").http_status(),
            TinyhopError::expired("x").http_status(),
            TinyhopError::unauthorized("x").http_status(),
            TinyhopError::validation("x").http_status(),
        ];
        assert_eq!(
            statuses,
            [
                StatusCode::NOT_FOUND,
                StatusCode::GONE,
                StatusCode::FORBIDDEN,
                StatusCode::BAD_REQUEST
            ]
        );
    }

    #[test]
    fn test_store_failures_are_server_errors() {
        assert!(TinyhopError::store_unavailable("db down")
            .http_status()
            .is_server_error());
        assert!(TinyhopError::timeout("slow").http_status().is_server_error());
        assert!(TinyhopError::token_space_exhausted("full")
            .http_status()
            .is_server_error());
        assert!(TinyhopError::corrupt_record("bad row")
            .http_status()
            .is_server_error());
    }

    #[test]
    fn test_format_simple() {
        let err = TinyhopError::validation("destination is required");
        assert_eq!(
            err.format_simple(),
            "Validation Error: destination is required"
        );
        assert_eq!(err.to_string(), err.format_simple());
        assert_eq!(err.code(), "E001");
    }

    #[test]
    fn test_db_err_maps_to_store_unavailable() {
        let err: TinyhopError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, TinyhopError::StoreUnavailable(_)));
    }
}
