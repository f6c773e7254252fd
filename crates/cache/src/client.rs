use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use libris_kernel::settings::{CacheBackend, CacheSettings};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::CacheError;
use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;
use crate::store::KeyValueStore;

/// Outcome of a cache read.
///
/// Callers that only care about "use it or load it" treat `Miss` and `Failed`
/// the same way; the reason is kept for logging.
#[derive(Debug)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
    Failed(CacheError),
}

impl<T> CacheLookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Failed(_) => None,
        }
    }
}

/// Best-effort JSON cache over a [`KeyValueStore`].
///
/// Cheap to clone; construct once at startup and hand it to whoever needs it.
#[derive(Clone)]
pub struct CacheClient {
    store: Option<Arc<dyn KeyValueStore>>,
}

impl CacheClient {
    /// Build the client described by `settings`.
    ///
    /// Never fails: if the store cannot be reached the client comes up
    /// unavailable and stays that way for the life of the process.
    pub async fn connect(settings: &CacheSettings) -> Self {
        if !settings.enabled {
            tracing::info!("cache disabled by configuration");
            return Self::disabled();
        }

        match settings.backend {
            CacheBackend::Memory => {
                let capacity =
                    NonZeroUsize::new(settings.memory_capacity).unwrap_or(NonZeroUsize::MIN);
                Self::with_store(Arc::new(MemoryStore::with_capacity(capacity))).await
            }
            CacheBackend::Redis => {
                let connected = RedisStore::connect(
                    &settings.url,
                    Duration::from_millis(settings.connect_timeout_ms),
                    Duration::from_millis(settings.op_timeout_ms),
                )
                .await;

                match connected {
                    Ok(store) => Self::with_store(Arc::new(store)).await,
                    Err(error) => {
                        tracing::warn!(%error, "redis connection failed, running without cache");
                        Self::disabled()
                    }
                }
            }
        }
    }

    /// Wrap an existing store, probing it once.
    pub async fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        match store.ping().await {
            Ok(()) => {
                tracing::info!(backend = store.backend(), "cache connection established");
                Self { store: Some(store) }
            }
            Err(error) => {
                tracing::warn!(
                    backend = store.backend(),
                    %error,
                    "cache probe failed, running without cache"
                );
                Self::disabled()
            }
        }
    }

    /// A client that reports every operation as unavailable.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Connectivity as established by the construction-time probe.
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Name of the backing store, if any.
    pub fn backend(&self) -> Option<&'static str> {
        self.store.as_ref().map(|store| store.backend())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let Some(store) = &self.store else {
            tracing::debug!(key, "cache unavailable, skipping get");
            return CacheLookup::Failed(CacheError::Unavailable);
        };

        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!(key, "cache miss");
                return CacheLookup::Miss;
            }
            Err(error) => {
                tracing::warn!(key, %error, "cache get failed");
                return CacheLookup::Failed(error);
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::info!(key, "cache hit");
                CacheLookup::Hit(value)
            }
            Err(error) => {
                tracing::warn!(key, %error, "cached payload is not valid, ignoring entry");
                CacheLookup::Failed(CacheError::Serialization(error))
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let Some(store) = &self.store else {
            tracing::debug!(key, "cache unavailable, skipping set");
            return Err(CacheError::Unavailable);
        };

        let payload = serde_json::to_string(value).map_err(|error| {
            tracing::warn!(key, %error, "cache payload serialization failed");
            CacheError::Serialization(error)
        })?;

        store
            .set_ex(key, payload, ttl)
            .await
            .inspect(|()| tracing::info!(key, ttl_secs = ttl.as_secs(), "cache set"))
            .inspect_err(|error| tracing::warn!(key, %error, "cache set failed"))
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let Some(store) = &self.store else {
            tracing::debug!(key, "cache unavailable, skipping delete");
            return Err(CacheError::Unavailable);
        };

        store
            .delete(key)
            .await
            .inspect(|()| tracing::info!(key, "cache delete"))
            .inspect_err(|error| tracing::warn!(key, %error, "cache delete failed"))
    }
}
