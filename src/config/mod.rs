//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML/JSON)
//!     → loader.rs (parse into an untyped tree)
//!     → validation.rs (fixed-order field checks)
//!     → store.rs (validated, immutable, shared via Arc)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs re-reads the file
//!     → store.rs validates the candidate
//!     → atomic swap of Arc<Value>, or keep the current config
//! ```
//!
//! # Design Decisions
//! - Config stays untyped (`serde_json::Value`); fields may be absent, null or mistyped
//! - Validation stops at the first broken rule and never mutates its input
//! - A rejected reload never replaces the running config

pub mod loader;
pub mod store;
pub mod validation;
pub mod value;
pub mod watcher;

pub use loader::{load_config, read_config, ConfigError};
pub use store::ConfigStore;
pub use validation::{validate, ErrorKind, ProxyEnv, ValidationError, Validator, ValidatorOptions};
pub use value::Field;
