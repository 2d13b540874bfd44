//! Key-value store access.
//!
//! # Data Flow
//! ```text
//! gateway code
//!     → KeyValueStore::read / write (one call = one store command)
//!     → redis.rs (RedisClient over one multiplexed connection)
//!
//! snapshot.rs layers validated config snapshots on top of any store.
//! ```
//!
//! # Design Decisions
//! - No retry, pooling or timeout here; store errors surface unchanged
//! - Values are plain strings; callers own their serialization

pub mod redis;
pub mod snapshot;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ValidationError;

pub use self::redis::{RedisClient, RedisSettings};
pub use snapshot::ConfigSnapshot;

/// Errors from key-value operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// Error reported by the Redis client or server.
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Connection settings could not be turned into a Redis URL.
    #[error("Invalid Redis address: {0}")]
    Address(String),

    /// Stored value is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored config snapshot no longer passes validation.
    #[error("Invalid config snapshot under '{key}': {source}")]
    InvalidSnapshot {
        key: String,
        #[source]
        source: ValidationError,
    },
}

pub type KvResult<T> = Result<T, KvError>;

/// Minimal read/write access to an external key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value under `key`, or `None` if it is not set.
    async fn read(&self, key: &str) -> KvResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> KvResult<()>;
}
