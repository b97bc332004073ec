//! Object-to-hash persistence with per-type secondary indexes.
//!
//! Every persisted entity maps to one hash record at its storage key. Each save
//! also appends `"<id>|<label>"` to the list `idx:<namespace>`, which is how
//! entities of a type are enumerated without a key scan.

use crate::store::{KeyValueStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Field name that carries an entity's identifier. The identifier is implied by
/// the record key, so this field is never written into the hash.
pub const IDENTIFIER_FIELD: &str = "Identifier";

/// Separator between id and label in an index entry
const INDEX_SEPARATOR: char = '|';

/// Errors surfaced by [`ObjectMapper`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapperError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("index '{key}' holds a malformed entry: {entry}")]
    CorruptIndex { key: String, entry: String },
}

/// A record the mapper knows how to persist.
///
/// Implementors list their string fields explicitly; the mapper applies the
/// skip-empty and skip-identifier policy.
pub trait Persistable: Send + Sync {
    /// Storage key of the hash record
    fn key(&self) -> String;

    fn identifier(&self) -> &str;

    /// Human-readable name recorded in the index
    fn label(&self) -> &str;

    /// Type discriminator naming the index list
    fn namespace_tag(&self) -> &'static str;

    /// Field name/value pairs contributed to the hash record
    fn fields(&self) -> Vec<(&'static str, &str)>;
}

/// One decoded index entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub label: String,
}

/// Name of the index list for a namespace
pub fn index_key(namespace: &str) -> String {
    format!("idx:{namespace}")
}

fn parse_index_entry(key: &str, raw: &str) -> Result<IndexEntry, MapperError> {
    match raw.split_once(INDEX_SEPARATOR) {
        Some((id, label)) => Ok(IndexEntry {
            id: id.to_string(),
            label: label.to_string(),
        }),
        None => Err(MapperError::CorruptIndex {
            key: key.to_string(),
            entry: raw.to_string(),
        }),
    }
}

/// Persists [`Persistable`] entities into a [`KeyValueStore`]
#[derive(Clone)]
pub struct ObjectMapper {
    store: Arc<dyn KeyValueStore>,
}

impl ObjectMapper {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Atomically allocate the next value of a sequence counter
    pub async fn next_id(&self, counter_key: &str) -> Result<i64, MapperError> {
        self.store.incr(counter_key).await.map_err(|e| {
            error!(target: "store", counter = %counter_key, error = %e, "Failed to allocate id");
            MapperError::from(e)
        })
    }

    /// Save entities one at a time, in order.
    ///
    /// The first store failure stops processing and is returned. Fields already
    /// written for that entity, and earlier entities, stay written.
    pub async fn save(&self, entities: &[&dyn Persistable]) -> Result<(), MapperError> {
        for entity in entities {
            let key = entity.key();

            for (field, value) in entity.fields() {
                if value.is_empty() || field == IDENTIFIER_FIELD {
                    continue;
                }
                self.store.hash_set(&key, field, value).await?;
            }

            let idx_key = index_key(entity.namespace_tag());
            let idx_value = format!(
                "{}{}{}",
                entity.identifier(),
                INDEX_SEPARATOR,
                entity.label()
            );
            self.store.list_push(&idx_key, &idx_value).await?;

            debug!(target: "store", key = %key, index = %idx_key, "Saved entity");
        }

        Ok(())
    }

    /// Read up to `limit` index entries for `namespace`, starting at `offset`.
    ///
    /// An entry without the `|` separator is a data-integrity fault and fails
    /// the whole read with [`MapperError::CorruptIndex`].
    pub async fn load_indexed(
        &self,
        namespace: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IndexEntry>, MapperError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        // An offset past the addressable range can only name an empty page.
        let Ok(start) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };
        let span = i64::try_from(limit - 1).unwrap_or(i64::MAX);
        let stop = start.saturating_add(span);

        let key = index_key(namespace);
        let raw = self.store.list_range(&key, start, stop).await?;

        raw.iter()
            .map(|entry| parse_index_entry(&key, entry))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| error!(target: "store", error = %e, "Index integrity fault"))
    }

    /// Read back the hash record stored at `key`
    pub async fn load_fields(&self, key: &str) -> Result<HashMap<String, String>, MapperError> {
        Ok(self.store.hash_get_all(key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provider;
    use crate::store::InMemoryStore;

    fn mapper() -> (ObjectMapper, InMemoryStore) {
        let store = InMemoryStore::new();
        (ObjectMapper::new(Arc::new(store.clone())), store)
    }

    #[actix_web::test]
    async fn test_save_skips_empty_and_identifier_fields() {
        let (mapper, _) = mapper();
        let provider = Provider {
            identifier: "7".to_string(),
            name: "FactCheck.org".to_string(),
            icon: String::new(),
            logo: "logo.png".to_string(),
            description: String::new(),
        };

        mapper.save(&[&provider]).await.unwrap();

        let fields = mapper.load_fields("prov:7").await.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("Name").map(String::as_str), Some("FactCheck.org"));
        assert_eq!(fields.get("Logo").map(String::as_str), Some("logo.png"));
        assert!(!fields.contains_key(IDENTIFIER_FIELD));
        assert!(!fields.contains_key("Icon"));
    }

    #[actix_web::test]
    async fn test_save_then_load_indexed_round_trip() {
        let (mapper, _) = mapper();
        let first = Provider::create(&mapper, "National Library of Medicine").await.unwrap();
        let second = Provider::create(&mapper, "Open|Library").await.unwrap();

        mapper.save(&[&first, &second]).await.unwrap();

        let entries = mapper.load_indexed("Provider", 0, 10).await.unwrap();
        assert_eq!(
            entries,
            vec![
                IndexEntry {
                    id: "1".to_string(),
                    label: "National Library of Medicine".to_string()
                },
                IndexEntry {
                    id: "2".to_string(),
                    label: "Open|Library".to_string()
                },
            ]
        );
    }

    #[actix_web::test]
    async fn test_saving_twice_appends_two_index_entries() {
        let (mapper, _) = mapper();
        let provider = Provider::create(&mapper, "OpenLibrary.org").await.unwrap();

        mapper.save(&[&provider]).await.unwrap();
        mapper.save(&[&provider]).await.unwrap();

        let entries = mapper.load_indexed("Provider", 0, 10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entries[1]);
    }

    #[actix_web::test]
    async fn test_load_indexed_respects_offset_and_limit() {
        let (mapper, _) = mapper();
        for name in ["a", "b", "c", "d", "e"] {
            let provider = Provider::create(&mapper, name).await.unwrap();
            mapper.save(&[&provider]).await.unwrap();
        }

        let page = mapper.load_indexed("Provider", 1, 2).await.unwrap();
        let labels: Vec<_> = page.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c"]);

        assert!(mapper.load_indexed("Provider", 0, 0).await.unwrap().is_empty());
        assert!(mapper.load_indexed("Provider", 10, 5).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_load_indexed_with_huge_offset_is_empty() {
        let (mapper, _) = mapper();
        for name in ["a", "b", "c"] {
            let provider = Provider::create(&mapper, name).await.unwrap();
            mapper.save(&[&provider]).await.unwrap();
        }

        for offset in [i64::MAX as usize, usize::MAX] {
            let page = mapper.load_indexed("Provider", offset, 1).await.unwrap();
            assert!(page.is_empty(), "offset {offset} should yield no entries");
        }
        let page = mapper.load_indexed("Provider", 0, usize::MAX).await.unwrap();
        assert_eq!(page.len(), 3);
    }

    #[actix_web::test]
    async fn test_corrupt_index_entry_is_a_typed_error() {
        let (mapper, store) = mapper();
        store.list_push("idx:Provider", "1001|Good").await.unwrap();
        store.list_push("idx:Provider", "no-separator").await.unwrap();

        let err = mapper.load_indexed("Provider", 0, 10).await.unwrap_err();
        assert_eq!(
            err,
            MapperError::CorruptIndex {
                key: "idx:Provider".to_string(),
                entry: "no-separator".to_string()
            }
        );
    }

    #[actix_web::test]
    async fn test_next_id_surfaces_non_integer_counter() {
        let (mapper, store) = mapper();
        store.set("nxProvId", "not-a-number").await.unwrap();

        let err = Provider::create(&mapper, "x").await.unwrap_err();
        assert!(matches!(
            err,
            MapperError::Store(StoreError::NotAnInteger { .. })
        ));
    }

    #[actix_web::test]
    async fn test_save_stops_at_first_store_failure() {
        let (mapper, store) = mapper();
        // Occupy the index key with a hash so the list append fails.
        store.hash_set("idx:Provider", "x", "y").await.unwrap();

        let first = Provider {
            identifier: "1".to_string(),
            name: "first".to_string(),
            ..Default::default()
        };
        let second = Provider {
            identifier: "2".to_string(),
            name: "second".to_string(),
            ..Default::default()
        };

        let err = mapper.save(&[&first, &second]).await.unwrap_err();
        assert!(matches!(err, MapperError::Store(StoreError::WrongType { .. })));

        // The first record's fields were written, the second was never reached.
        assert_eq!(mapper.load_fields("prov:1").await.unwrap().len(), 1);
        assert!(mapper.load_fields("prov:2").await.unwrap().is_empty());
    }
}
