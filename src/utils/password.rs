//! 链接密码的哈希与校验
//!
//! 使用 Argon2id + 随机盐；明文密码从不落库。
//! 校验的比较由 `password-hash` 以常量时间完成。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::TinyhopError;

#[derive(Debug)]
pub enum PasswordError {
    HashError(String),
    /// 存储的哈希本身无法解析
    MalformedHash(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashError(msg) => write!(f, "Password hash error: {}", msg),
            Self::MalformedHash(msg) => write!(f, "Stored password hash is malformed: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

impl From<PasswordError> for TinyhopError {
    fn from(err: PasswordError) -> Self {
        TinyhopError::password_hash(err.to_string())
    }
}

/// 对密码进行 Argon2id 哈希
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// 校验密码；`Ok(false)` 表示不匹配，`Err` 表示存储的哈希损坏
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 处理创建链接时提交的密码
///
/// - None 或空字符串 → 无密码
/// - 否则返回哈希
pub fn process_new_password(password: Option<&str>) -> Result<Option<String>, PasswordError> {
    match password {
        Some(pwd) if !pwd.is_empty() => hash_password(pwd).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash).expect("verify should succeed"));
        assert!(!verify_password("hunter3", &hash).expect("verify should succeed"));
        assert!(!verify_password("", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a).unwrap());
        assert!(verify_password("same", &b).unwrap());
    }

    #[test]
    fn test_process_new_password() {
        assert!(process_new_password(None).unwrap().is_none());
        assert!(process_new_password(Some("")).unwrap().is_none());

        let stored = process_new_password(Some("secret")).unwrap().unwrap();
        assert_ne!(stored, "secret");
        assert!(verify_password("secret", &stored).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let err = verify_password("x", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, PasswordError::MalformedHash(_)));

        let mapped: TinyhopError = err.into();
        assert!(matches!(mapped, TinyhopError::PasswordHash(_)));
    }
}
