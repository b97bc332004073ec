//! In-memory [`KeyValueStore`] for tests and local runs without Redis.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum Entry {
    Value(String),
    List(Vec<String>),
    Hash(HashMap<String, String>),
}

/// Non-persistent store mirroring the Redis semantics the mapper relies on.
///
/// Cloning shares the underlying data, so a clone handed to the app and a clone
/// kept by a test observe the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<Mutex<HashMap<String, Entry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve Redis-style inclusive, possibly negative, bounds against `len`.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { len.saturating_add(start).max(0) } else { start };
    let stop = if stop < 0 { len.saturating_add(stop) } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.insert(key.to_string(), Entry::Value(value.to_string()));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut data = self.data.lock().await;
        let current = match data.get(key) {
            None => 0,
            Some(Entry::Value(v)) => v.parse::<i64>().map_err(|_| StoreError::NotAnInteger {
                key: key.to_string(),
            })?,
            Some(_) => {
                return Err(StoreError::WrongType {
                    key: key.to_string(),
                });
            }
        };

        let next = current.checked_add(1).ok_or_else(|| StoreError::NotAnInteger {
            key: key.to_string(),
        })?;
        data.insert(key.to_string(), Entry::Value(next.to_string()));
        Ok(next)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        match data
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(fields) => {
                fields.insert(field.to_string(), value.to_string());
                Ok(())
            }
            _ => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let data = self.data.lock().await;
        match data.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(fields)) => Ok(fields.clone()),
            Some(_) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        match data
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()))
        {
            Entry::List(items) => {
                items.push(value.to_string());
                Ok(())
            }
            _ => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn list_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, StoreError> {
        let data = self.data.lock().await;
        match data.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(_) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn flush_all(&self) -> Result<(), StoreError> {
        self.data.lock().await.clear();
        Ok(())
    }
}
