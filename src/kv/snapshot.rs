//! Validated configuration snapshots in a key-value store.
//!
//! The gateway caches its last good configuration so it can restart
//! without reaching the remote config source. Snapshots are validated on
//! the way in and again on the way out.

use serde_json::Value;

use crate::config::Validator;
use crate::kv::{KeyValueStore, KvError, KvResult};

/// A config snapshot slot identified by a cache key.
pub struct ConfigSnapshot<S> {
    store: S,
    key: String,
    validator: Validator,
}

impl<S: KeyValueStore> ConfigSnapshot<S> {
    pub fn new(store: S, key: impl Into<String>, validator: Validator) -> Self {
        Self {
            store,
            key: key.into(),
            validator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `config` and write it under the snapshot key.
    pub async fn save(&self, config: &Value) -> KvResult<()> {
        self.validator.validate(config).map_err(|source| KvError::InvalidSnapshot {
            key: self.key.clone(),
            source,
        })?;
        let payload = serde_json::to_string(config)?;
        self.store.write(&self.key, &payload).await?;
        tracing::info!(key = %self.key, bytes = payload.len(), "Saved config snapshot");
        Ok(())
    }

    /// Read the snapshot back. `Ok(None)` when nothing has been saved yet.
    pub async fn load(&self) -> KvResult<Option<Value>> {
        let Some(payload) = self.store.read(&self.key).await? else {
            tracing::debug!(key = %self.key, "No config snapshot stored");
            return Ok(None);
        };
        let config: Value = serde_json::from_str(&payload)?;
        self.validator.validate(&config).map_err(|source| KvError::InvalidSnapshot {
            key: self.key.clone(),
            source,
        })?;
        Ok(Some(config))
    }
}
