use std::time::Duration;

use thiserror::Error;

/// Why a cache operation did not complete.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache is unavailable")]
    Unavailable,
    #[error("cache transport error: {0}")]
    Transport(String),
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("cache payload could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<::redis::RedisError> for CacheError {
    fn from(err: ::redis::RedisError) -> Self {
        Self::Transport(err.to_string())
    }
}
