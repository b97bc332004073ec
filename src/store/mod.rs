//! Key-value store abstraction used by the persistence layer.
//!
//! The service only needs a handful of Redis-style primitives: plain string
//! values, atomic counters, hashes, and lists. [`KeyValueStore`] names exactly
//! those, so the object mapper can run against Redis in production and against
//! [`InMemoryStore`] in tests.

pub mod memory;
pub mod redis_store;

pub use memory::InMemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by a [`KeyValueStore`] backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store connection failed: {reason}")]
    Connection { reason: String },
    #[error("store command failed: {reason}")]
    Command { reason: String },
    #[error("value at '{key}' is not an integer")]
    NotAnInteger { key: String },
    #[error("value at '{key}' holds the wrong kind of value")]
    WrongType { key: String },
}

/// Minimal primitives the persistence layer requires from its backing store.
///
/// Every call is one round-trip; there are no transactions and the backend's
/// own last-write-wins semantics are authoritative.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Atomically increment the integer at `key`, returning the new value.
    /// A missing key counts as zero.
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Append `value` to the tail of the list at `key`.
    async fn list_push(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Inclusive range read with Redis `LRANGE` index semantics.
    async fn list_range(&self, key: &str, start: i64, stop: i64)
    -> Result<Vec<String>, StoreError>;

    async fn flush_all(&self) -> Result<(), StoreError>;
}
