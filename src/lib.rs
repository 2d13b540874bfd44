//! Gateway configuration validation and key-value access.

pub mod config;
pub mod kv;
pub mod observability;

pub use config::{validate, ValidationError, Validator};
pub use kv::{KeyValueStore, RedisClient};
