//! Current configuration holder with validated hot swap.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::config::validation::{ValidationError, Validator};

/// Holds the configuration the gateway is running with.
///
/// Readers get a cheap `Arc` snapshot; writers must pass validation
/// before their candidate becomes visible.
pub struct ConfigStore {
    current: ArcSwap<Value>,
    validator: Validator,
}

impl ConfigStore {
    /// Create a store from an initial config, rejecting it if invalid.
    pub fn new(initial: Value, validator: Validator) -> Result<Self, ValidationError> {
        validator.validate(&initial)?;
        Ok(Self {
            current: ArcSwap::from_pointee(initial),
            validator,
        })
    }

    /// The currently accepted configuration.
    pub fn current(&self) -> Arc<Value> {
        self.current.load_full()
    }

    /// Validate `candidate` and make it current. On failure the previous
    /// configuration stays in place.
    pub fn replace(&self, candidate: Value) -> Result<Arc<Value>, ValidationError> {
        if let Err(err) = self.validator.validate(&candidate) {
            tracing::warn!(path = %err.path(), kind = ?err.kind(), "Rejected configuration: {}", err);
            return Err(err);
        }
        let accepted = Arc::new(candidate);
        self.current.store(accepted.clone());
        tracing::info!("Configuration accepted");
        Ok(accepted)
    }
}
