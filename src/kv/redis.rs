//! Redis-backed key-value client.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Field;
use crate::kv::{KeyValueStore, KvError, KvResult};

/// Connection parameters for the Redis client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: u32,
    pub password: Option<String>,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
            password: None,
        }
    }
}

impl RedisSettings {
    /// Take `edgemicro.redisHost/redisPort/redisDb/redisPassword` from a
    /// gateway configuration, keeping defaults for anything unset.
    pub fn from_config(config: &serde_json::Value) -> Self {
        let edgemicro = Field::root(config).get("edgemicro");
        let defaults = Self::default();
        Self {
            host: edgemicro
                .get("redisHost")
                .as_str()
                .map(str::to_string)
                .unwrap_or(defaults.host),
            port: edgemicro
                .get("redisPort")
                .as_number()
                .filter(|p| p.fract() == 0.0 && (1.0..=65535.0).contains(p))
                .map_or(defaults.port, |p| p as u16),
            db: edgemicro
                .get("redisDb")
                .as_number()
                .filter(|d| d.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(d))
                .map_or(defaults.db, |d| d as u32),
            password: edgemicro.get("redisPassword").as_str().map(str::to_string),
        }
    }

    /// Connection URL in `redis://[:password@]host:port/db` form.
    pub fn url(&self) -> KvResult<Url> {
        let mut url = Url::parse("redis://localhost").map_err(|e| KvError::Address(e.to_string()))?;
        url.set_host(Some(&self.host))
            .map_err(|e| KvError::Address(format!("{}: {}", self.host, e)))?;
        url.set_port(Some(self.port))
            .map_err(|_| KvError::Address(format!("cannot set port {}", self.port)))?;
        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|_| KvError::Address("cannot set password".to_string()))?;
        }
        url.set_path(&format!("/{}", self.db));
        Ok(url)
    }
}

/// Thin pass-through client over a single multiplexed Redis connection.
///
/// One connect attempt, no reconnect: a lost connection surfaces as an
/// error on the next call.
#[derive(Clone)]
pub struct RedisClient {
    conn: MultiplexedConnection,
    settings: RedisSettings,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("host", &self.settings.host)
            .field("port", &self.settings.port)
            .field("db", &self.settings.db)
            .finish()
    }
}

impl RedisClient {
    /// Connect to Redis. Resolves once the connection is established.
    pub async fn connect(settings: RedisSettings) -> KvResult<Self> {
        let url = settings.url()?;
        let client = redis::Client::open(url.as_str())?;
        let conn = client.get_multiplexed_tokio_connection().await?;

        tracing::info!(host = %settings.host, port = settings.port, db = settings.db, "Connected to Redis");
        Ok(Self { conn, settings })
    }
}

#[async_trait]
impl KeyValueStore for RedisClient {
    async fn read(&self, key: &str) -> KvResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        tracing::debug!(key, found = value.is_some(), "Redis read");
        Ok(value)
    }

    async fn write(&self, key: &str, value: &str) -> KvResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        tracing::debug!(key, "Redis write");
        Ok(())
    }
}
