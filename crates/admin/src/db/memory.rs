//! In-memory document store for testing.
//!
//! Collections keep insertion order, which serves as this store's native
//! order for `list`. Replacing a document keeps its position.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use record_console_core::{CollectionKind, Document};

use super::{DocumentStore, StoreError};

type Collection = Vec<(String, Document)>;

/// Thread-safe in-memory store. Not suitable for production.
///
/// Raw queries are not supported and always fail with `StoreError::Query`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<CollectionKind, Collection>>,
}

impl MemoryDocumentStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(kind: CollectionKind, key: &str) -> StoreError {
    StoreError::NotFound {
        collection: kind,
        key: key.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, kind: CollectionKind, key: &str) -> Result<Document, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(&kind)
            .and_then(|docs| docs.iter().find(|(k, _)| k == key))
            .map(|(_, doc)| doc.clone())
            .ok_or_else(|| not_found(kind, key))
    }

    async fn upsert(
        &self,
        kind: CollectionKind,
        key: &str,
        document: &Document,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(kind).or_default();
        match docs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => existing.clone_from(document),
            None => docs.push((key.to_string(), document.clone())),
        }
        Ok(())
    }

    async fn remove(&self, kind: CollectionKind, key: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(&kind)
            .ok_or_else(|| not_found(kind, key))?;
        let position = docs
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| not_found(kind, key))?;
        docs.remove(position);
        Ok(())
    }

    async fn list(
        &self,
        kind: CollectionKind,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(collections
            .get(&kind)
            .map(|docs| {
                docs.iter()
                    .skip(skip)
                    .take(take)
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, kind: CollectionKind) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let len = collections.get(&kind).map_or(0, Vec::len);
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }

    async fn clear(&self, kind: CollectionKind) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections.remove(&kind).map_or(0, |docs| docs.len());
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn query(&self, text: &str) -> Result<Vec<JsonValue>, StoreError> {
        Err(StoreError::Query(format!(
            "raw queries are not supported by the in-memory store: {text}"
        )))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
