//! Redis-backed [`KeyValueStore`].

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use redis::{AsyncCommands, ErrorKind, RedisError, aio::ConnectionManager};
use std::collections::HashMap;
use tracing::info;

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_timeout() {
            StoreError::Connection {
                reason: err.to_string(),
            }
        } else {
            StoreError::Command {
                reason: err.to_string(),
            }
        }
    }
}

/// Store backed by a single multiplexed, auto-reconnecting Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis server described by `url`
    /// (`redis://[:password@]host:port/db`).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connection {
            reason: e.to_string(),
        })?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Connection {
                reason: e.to_string(),
            })?;

        info!(target: "store", "Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let result: Result<i64, RedisError> = conn.incr(key, 1).await;
        result.map_err(|err| match err.kind() {
            ErrorKind::ResponseError | ErrorKind::TypeError => StoreError::NotAnInteger {
                key: key.to_string(),
            },
            _ => StoreError::from(err),
        })
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.hgetall(key).await?)
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(key, value).await?;
        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.lrange(key, start as isize, stop as isize).await?)
    }

    async fn flush_all(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHALL").query_async(&mut conn).await?;
        Ok(())
    }
}
