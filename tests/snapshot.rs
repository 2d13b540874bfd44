//! Config snapshots over an in-memory store.

use serde_json::json;

use edgemicro_config::config::Validator;
use edgemicro_config::kv::{ConfigSnapshot, KeyValueStore, KvError};

mod common;
use common::{gateway_config, MemoryStore};

#[tokio::test]
async fn test_snapshot_round_trip() {
    let snapshot = ConfigSnapshot::new(MemoryStore::default(), "acme-test-config", Validator::default());
    assert!(snapshot.load().await.unwrap().is_none());

    let config = gateway_config();
    snapshot.save(&config).await.unwrap();

    let restored = snapshot.load().await.unwrap().expect("snapshot should exist");
    assert_eq!(restored, config);
}

#[tokio::test]
async fn test_save_rejects_invalid_config() {
    let snapshot = ConfigSnapshot::new(MemoryStore::default(), "acme-test-config", Validator::default());
    let mut config = gateway_config();
    config["edge_config"]["synchronizerMode"] = json!(5);

    let err = snapshot.save(&config).await.unwrap_err();
    assert!(matches!(err, KvError::InvalidSnapshot { .. }));
    assert!(snapshot.store().read("acme-test-config").await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_rejects_stale_snapshot() {
    let store = MemoryStore::default();
    store
        .write("acme-test-config", r#"{"quotas":{"bufferSize":{"year":10}}}"#)
        .await
        .unwrap();

    let snapshot = ConfigSnapshot::new(store, "acme-test-config", Validator::default());
    match snapshot.load().await {
        Err(KvError::InvalidSnapshot { key, source }) => {
            assert_eq!(key, "acme-test-config");
            assert!(source.to_string().starts_with("invalid value in config.quotas.bufferSize: year"));
        }
        other => panic!("expected invalid snapshot, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_rejects_corrupt_payload() {
    let store = MemoryStore::default();
    store.write("acme-test-config", "not json").await.unwrap();

    let snapshot = ConfigSnapshot::new(store, "acme-test-config", Validator::default());
    assert!(matches!(snapshot.load().await, Err(KvError::Serialization(_))));
}
