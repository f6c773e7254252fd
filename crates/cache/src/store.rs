use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Raw string key/value store with expiring entries.
///
/// Implementations report failures through `CacheError`; turning those into
/// fallbacks is the job of [`crate::CacheClient`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
