//! Redis client against a live server on 127.0.0.1:6379.
//!
//! Run with `cargo test -- --ignored` when a local Redis is available.

use std::time::{Duration, Instant};

use edgemicro_config::kv::{KeyValueStore, RedisClient, RedisSettings};

#[tokio::test]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn test_read_missing_key_returns_none() {
    let client = RedisClient::connect(RedisSettings::default()).await.unwrap();
    let value = client.read("edgemicro-config-test-missing-key").await.unwrap();
    assert!(value.is_none());
}

#[tokio::test]
#[ignore = "requires a Redis server on 127.0.0.1:6379"]
async fn test_write_then_read() {
    let client = RedisClient::connect(RedisSettings::default()).await.unwrap();
    client.write("edgemicro-config-test-key", "testValue").await.unwrap();
    let value = client.read("edgemicro-config-test-key").await.unwrap();
    assert_eq!(value.as_deref(), Some("testValue"));
}

#[tokio::test]
async fn test_connect_failure_is_reported_without_retry() {
    // Port 1 is reserved and never runs Redis.
    let settings = RedisSettings {
        port: 1,
        ..RedisSettings::default()
    };
    let started = Instant::now();
    let result = RedisClient::connect(settings).await;
    let elapsed = started.elapsed();

    assert!(result.is_err());
    // A refused local connect fails immediately; backoff retries would take seconds.
    assert!(elapsed < Duration::from_millis(1000), "connect took {:?}", elapsed);
}
