//! Token generation
//!
//! Tokens are random strings over an alphabet without look-alike characters
//! (`0 O 1 l I`). Uniqueness is decided by the store: a candidate is only
//! accepted once the insert that claims it succeeds.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::LinksConfig;
use crate::errors::{Result, TinyhopError};

/// 去掉 0 O 1 l I 后的字母表
pub const TOKEN_ALPHABET: &[u8] = b"23456789abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// 与路由前缀同名的 token 会被路由遮蔽，不予发放
pub const RESERVED_TOKENS: &[&str] = &["links", "analytics", "health"];

pub fn is_reserved_token(token: &str) -> bool {
    RESERVED_TOKENS.iter().any(|r| r.eq_ignore_ascii_case(token))
}

/// 候选 token 来源
pub trait TokenSource: Send + Sync {
    fn next_token(&self, length: usize) -> String;
}

/// 基于线程本地 RNG 的随机来源
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn next_token(&self, length: usize) -> String {
        std::iter::repeat_with(|| TOKEN_ALPHABET[rand::random_range(0..TOKEN_ALPHABET.len())] as char)
            .take(length)
            .collect()
    }
}

#[derive(Clone)]
pub struct TokenGenerator {
    source: Arc<dyn TokenSource>,
    length: usize,
    max_attempts: u32,
}

impl TokenGenerator {
    pub fn new(source: Arc<dyn TokenSource>, length: usize, max_attempts: u32) -> Self {
        Self {
            source,
            length,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &LinksConfig) -> Self {
        Self::new(
            Arc::new(RandomTokenSource),
            config.token_length,
            config.token_max_attempts,
        )
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draw a single candidate without claiming it.
    pub fn generate(&self) -> String {
        self.source.next_token(self.length)
    }

    /// 发放 token：把候选交给 `claim`，`Conflict` 时换一个重试
    ///
    /// `claim` 的其他错误直接返回；`max_attempts` 次都冲突则返回
    /// `TokenSpaceExhausted`。保留字候选同样消耗一次尝试。
    pub async fn issue<T, F, Fut>(&self, mut claim: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generate();

            if is_reserved_token(&candidate) {
                debug!("Skipping reserved token candidate '{}'", candidate);
                continue;
            }

            match claim(candidate.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_conflict() => {
                    warn!(
                        "Token collision on '{}' (attempt {}/{})",
                        candidate, attempt, self.max_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        error!(
            "Could not issue a unique token after {} attempts",
            self.max_attempts
        );
        Err(TinyhopError::token_space_exhausted(format!(
            "No unique token found after {} attempts",
            self.max_attempts
        )))
    }
}
