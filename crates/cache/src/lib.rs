//! Cache client for libris.
//!
//! The [`CacheClient`] never fails its caller: every read comes back as a
//! [`CacheLookup`] and every write as a `Result` the caller is free to log and
//! drop. Availability is decided once, by a single probe when the client is
//! constructed.
//!
//! Stores plug in behind [`KeyValueStore`]; [`RedisStore`] is the production
//! backend and [`MemoryStore`] keeps entries in-process.

pub mod client;
pub mod error;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use client::{CacheClient, CacheLookup};
pub use error::CacheError;
pub use memory::{MemoryStore, DEFAULT_MEMORY_CAPACITY};
pub use redis_store::RedisStore;
pub use store::KeyValueStore;
