//! Shared fixtures for integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use edgemicro_config::kv::{KeyValueStore, KvResult};

/// A fully populated gateway configuration that passes validation.
/// Mirrors `tests/fixtures/gateway.yaml`.
#[allow(dead_code)]
pub fn gateway_config() -> Value {
    json!({
        "edge_config": {
            "bootstrap": "https://edgemicroservices.example.com/edgemicro/bootstrap/organization/acme/environment/test",
            "jwt_public_key": "https://acme-test.example.net/edgemicro-auth/publicKey",
            "refresh_interval": 3_600_000,
            "retry_interval": 3_600_000,
            "redisBasedConfigCache": false,
            "synchronizerMode": 0
        },
        "edgemicro": {
            "port": 8000,
            "max_connections": 1000,
            "keep_alive_timeout": 5000,
            "headers_timeout": 60000,
            "enableAnalytics": true,
            "logTargetErrorsAs": "error",
            "enable_GET_req_body": false,
            "logging": {
                "level": "error",
                "dir": "/var/tmp",
                "stats_log_interval": 60,
                "rotate_interval": 24,
                "to_console": false
            },
            "plugins": {
                "sequence": ["oauth"],
                "excludeUrls": "/health",
                "disableExcUrlsCache": false
            }
        },
        "headers": {
            "x-forwarded-for": true,
            "x-forwarded-host": true,
            "via": true
        },
        "oauth": {
            "allowNoAuthorization": false,
            "allowInvalidAuthorization": false
        },
        "analytics": {
            "bufferSize": 10000,
            "batchSize": 500,
            "flushInterval": 5000
        }
    })
}

/// Set `value` at a dotted path, creating intermediate objects.
#[allow(dead_code)]
pub fn with_field(mut config: Value, path: &str, value: Value) -> Value {
    let mut node = &mut config;
    let mut keys = path.split('.').peekable();
    while let Some(key) = keys.next() {
        if !node.is_object() {
            *node = json!({});
        }
        let map = node.as_object_mut().unwrap();
        if keys.peek().is_none() {
            map.insert(key.to_string(), value);
            break;
        }
        node = map.entry(key.to_string()).or_insert_with(|| json!({}));
    }
    config
}

/// In-memory key-value store for exercising store consumers.
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> KvResult<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
