use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, trace, warn};
use weeklink_core::error::Result;
use weeklink_core::{KeyValueStore, StorageError};

/// A Redis-based implementation of [`KeyValueStore`].
///
/// Values are stored as JSON strings under a configurable key prefix.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_connection_dropped() || err.is_connection_refusal() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisStore {
    /// Creates a new Redis store using the default `weeklink:` key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, "weeklink:")
    }

    /// Creates a new Redis store with a custom key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `key_prefix` - Custom prefix for keys (e.g., "myapp:")
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `redis_url` and wraps it.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid Redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    fn redis_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let redis_key = self.redis_key(key);
        trace!(key, "Fetching value from Redis");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&redis_key).await {
            Ok(Some(stored)) => match serde_json::from_str::<Value>(&stored) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(key, error = %e, "Failed to deserialize stored value");
                    Err(StorageError::InvalidData(format!(
                        "invalid stored value for key '{redis_key}': {e}"
                    )))
                }
            },
            Ok(None) => {
                trace!(key, "Key not present in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let redis_key = self.redis_key(key);
        trace!(key, "Storing value in Redis");

        let json = serde_json::to_string(&value).map_err(|e| {
            warn!(key, error = %e, "Failed to serialize value");
            StorageError::Serialization(format!("failed to serialize value: {e}"))
        })?;

        let mut conn = self.conn.clone();
        match conn.set::<_, _, ()>(&redis_key, json).await {
            Ok(()) => {
                debug!(key, "Stored value in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to store value in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
