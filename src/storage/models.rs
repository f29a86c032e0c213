use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored token → destination binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub token: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub access_count: u64,
    /// Argon2id PHC 字符串，None 表示公开链接
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

impl Mapping {
    /// 过期是逻辑状态：`now >= expires_at` 即视为过期
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Insert payload; `access_count` always starts at zero
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub token: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    pub id: i64,
    pub token: String,
    pub accessed_at: DateTime<Utc>,
    pub caller_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn mapping(created_at: DateTime<Utc>, ttl: Duration) -> Mapping {
        Mapping {
            token: "abc2345".to_string(),
            destination: "https://example.com".to_string(),
            created_at,
            expires_at: created_at + ttl,
            access_count: 0,
            password_hash: None,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let link = mapping(now, Duration::hours(1));
        assert!(!link.is_expired_at(now + Duration::minutes(59)));
        assert!(link.is_expired_at(now + Duration::hours(1)));
        assert!(link.is_expired_at(now + Duration::minutes(61)));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut link = mapping(Utc::now(), Duration::hours(1));
        link.password_hash = Some("$argon2id$secret".to_string());
        let json = serde_json::to_string(&link).expect("serialize");
        assert!(!json.contains("argon2id"));
        assert!(link.is_password_protected());
    }
}
