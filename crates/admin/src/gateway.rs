//! Generic record gateway.
//!
//! Translates a (collection, operation, key) request into document store
//! calls. There is one code path per operation for all five collections;
//! collection-specific behavior lives in [`CollectionKind`].
//!
//! # Consistency
//!
//! Every write is a single-key store call. Nothing spans documents: deleting a
//! user leaves its orders in place, and foreign-key fields are never checked.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value as JsonValue, json};
use tracing::{instrument, warn};

use record_console_core::{CollectionKind, Document, Page, PageRequest};

use crate::db::{DocumentStore, StoreError};

/// Gateway over a shared document store.
#[derive(Clone)]
pub struct RecordGateway {
    store: Arc<dyn DocumentStore>,
    raw_query_timeout: Option<Duration>,
}

impl std::fmt::Debug for RecordGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordGateway")
            .field("raw_query_timeout", &self.raw_query_timeout)
            .finish_non_exhaustive()
    }
}

impl RecordGateway {
    /// Create a gateway with no raw query timeout.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            raw_query_timeout: None,
        }
    }

    /// Bound raw console queries to `timeout`.
    #[must_use]
    pub const fn with_raw_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.raw_query_timeout = timeout;
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Fetch one page of a collection plus its total page count.
    ///
    /// Pages past the end come back empty. Order is the store's native order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if either the range fetch or the count fails.
    #[instrument(skip(self), fields(collection = %kind, page = request.page(), per_page = request.per_page()))]
    pub async fn list(
        &self,
        kind: CollectionKind,
        request: PageRequest,
    ) -> Result<Page<Document>, StoreError> {
        let items = self
            .store
            .list(kind, request.limit(), request.offset())
            .await?;
        let total = self.store.count(kind).await?;
        Ok(Page::new(items, request, total))
    }

    /// Exact-key lookup.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key is absent.
    #[instrument(skip(self), fields(collection = %kind))]
    pub async fn get(&self, kind: CollectionKind, key: &str) -> Result<Document, StoreError> {
        self.store.get(kind, key).await
    }

    /// Create or fully replace the record at `key`. No validation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    #[instrument(skip(self, fields), fields(collection = %kind))]
    pub async fn upsert(
        &self,
        kind: CollectionKind,
        key: &str,
        fields: &Document,
    ) -> Result<(), StoreError> {
        self.store.upsert(kind, key, fields).await
    }

    /// Remove the record at `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key is absent.
    #[instrument(skip(self), fields(collection = %kind))]
    pub async fn delete(&self, kind: CollectionKind, key: &str) -> Result<(), StoreError> {
        self.store.remove(kind, key).await
    }

    /// Run a store-native query from the console.
    ///
    /// Never fails: a store error becomes [`QueryOutcome::Failed`] holding a
    /// single `{"error": "..."}` row. Blank input runs nothing and returns no
    /// rows.
    #[instrument(skip(self, text), fields(query_len = text.len()))]
    pub async fn raw_query(&self, text: &str) -> QueryOutcome {
        let text = text.trim();
        if text.is_empty() {
            return QueryOutcome::Rows(Vec::new());
        }

        let result = match self.raw_query_timeout {
            Some(limit) => tokio::time::timeout(limit, self.store.query(text))
                .await
                .unwrap_or_else(|_| Err(StoreError::Timeout(limit))),
            None => self.store.query(text).await,
        };

        match result {
            Ok(rows) => QueryOutcome::Rows(rows),
            Err(e) => {
                warn!(error = %e, "Console query failed");
                QueryOutcome::Failed(error_row(&e))
            }
        }
    }
}

/// Result of a console query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Rows exactly as the store returned them.
    Rows(Vec<JsonValue>),
    /// The query failed; holds the error row shown in place of results.
    Failed(JsonValue),
}

impl QueryOutcome {
    /// Rows to display: the result rows, or the single error row.
    #[must_use]
    pub fn rows(&self) -> &[JsonValue] {
        match self {
            Self::Rows(rows) => rows,
            Self::Failed(row) => std::slice::from_ref(row),
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The one-row result shown in place of rows when a query fails.
#[must_use]
pub fn error_row(error: &StoreError) -> JsonValue {
    json!({ "error": error.to_string() })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use async_trait::async_trait;

    fn gateway() -> RecordGateway {
        RecordGateway::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn product(n: usize) -> Document {
        let mut doc = Document::new();
        doc.insert("key".to_string(), json!(format!("p{n}")));
        doc.insert("name".to_string(), json!(format!("product {n}")));
        doc.insert("price".to_string(), json!(9.99));
        doc
    }

    async fn seed_products(gateway: &RecordGateway, count: usize) {
        for n in 0..count {
            gateway
                .upsert(CollectionKind::Products, &format!("p{n}"), &product(n))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_pages_and_totals() {
        let gateway = gateway();
        seed_products(&gateway, 25).await;

        for (page, expected) in [(1, 10), (2, 10), (3, 5), (4, 0)] {
            let result = gateway
                .list(CollectionKind::Products, PageRequest::new(page, 10).unwrap())
                .await
                .unwrap();
            assert_eq!(result.items.len(), expected, "page {page}");
            assert_eq!(result.total_pages, 3);
            assert_eq!(result.total_items, 25);
        }
    }

    #[tokio::test]
    async fn test_list_never_exceeds_page_size() {
        let gateway = gateway();
        seed_products(&gateway, 17).await;

        for per_page in 1..=20 {
            let request = PageRequest::new(1, per_page).unwrap();
            let page = gateway.list(CollectionKind::Products, request).await.unwrap();
            assert!(page.items.len() <= usize::try_from(per_page).unwrap());
            assert_eq!(page.total_pages, 17_u64.div_ceil(u64::try_from(per_page).unwrap()));
        }
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let page = gateway()
            .list(CollectionKind::Users, PageRequest::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_upsert_get_returns_exact_fields() {
        let gateway = gateway();
        let fields = product(1);
        gateway
            .upsert(CollectionKind::Products, "p1", &fields)
            .await
            .unwrap();
        gateway
            .upsert(CollectionKind::Products, "p1", &fields)
            .await
            .unwrap();

        assert_eq!(
            gateway.get(CollectionKind::Products, "p1").await.unwrap(),
            fields
        );
        let page = gateway
            .list(CollectionKind::Products, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn test_upsert_fully_replaces() {
        let gateway = gateway();
        gateway
            .upsert(CollectionKind::Products, "p1", &product(1))
            .await
            .unwrap();

        let mut replacement = Document::new();
        replacement.insert("name".to_string(), json!("only field"));
        gateway
            .upsert(CollectionKind::Products, "p1", &replacement)
            .await
            .unwrap();

        let stored = gateway.get(CollectionKind::Products, "p1").await.unwrap();
        assert_eq!(stored, replacement);
        assert!(!stored.contains_key("price"));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let gateway = gateway();
        seed_products(&gateway, 1).await;
        gateway.delete(CollectionKind::Products, "p0").await.unwrap();

        let err = gateway.get(CollectionKind::Products, "p0").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let err = gateway()
            .delete(CollectionKind::Users, "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_does_not_cascade() {
        let gateway = gateway();
        let mut order = Document::new();
        order.insert("user_id".to_string(), json!("u1"));
        gateway
            .upsert(CollectionKind::Users, "u1", &Document::new())
            .await
            .unwrap();
        gateway
            .upsert(CollectionKind::Orders, "o1", &order)
            .await
            .unwrap();

        gateway.delete(CollectionKind::Users, "u1").await.unwrap();
        assert_eq!(gateway.get(CollectionKind::Orders, "o1").await.unwrap(), order);
    }

    #[tokio::test]
    async fn test_raw_query_error_is_single_row() {
        let outcome = gateway().raw_query("not a real query").await;
        assert!(outcome.is_failed());
        let rows = outcome.rows();
        assert_eq!(rows.len(), 1);
        let error = rows[0].get("error").and_then(JsonValue::as_str).unwrap();
        assert!(error.contains("not a real query"));
    }

    #[tokio::test]
    async fn test_raw_query_blank_runs_nothing() {
        let outcome = gateway().raw_query("   ").await;
        assert_eq!(outcome, QueryOutcome::Rows(Vec::new()));
    }

    /// Store whose queries never finish.
    struct HangingStore(MemoryDocumentStore);

    #[async_trait]
    impl DocumentStore for HangingStore {
        async fn get(&self, kind: CollectionKind, key: &str) -> Result<Document, StoreError> {
            self.0.get(kind, key).await
        }
        async fn upsert(
            &self,
            kind: CollectionKind,
            key: &str,
            document: &Document,
        ) -> Result<(), StoreError> {
            self.0.upsert(kind, key, document).await
        }
        async fn remove(&self, kind: CollectionKind, key: &str) -> Result<(), StoreError> {
            self.0.remove(kind, key).await
        }
        async fn list(
            &self,
            kind: CollectionKind,
            limit: u64,
            offset: u64,
        ) -> Result<Vec<Document>, StoreError> {
            self.0.list(kind, limit, offset).await
        }
        async fn count(&self, kind: CollectionKind) -> Result<u64, StoreError> {
            self.0.count(kind).await
        }
        async fn clear(&self, kind: CollectionKind) -> Result<u64, StoreError> {
            self.0.clear(kind).await
        }
        async fn query(&self, _text: &str) -> Result<Vec<JsonValue>, StoreError> {
            std::future::pending().await
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_raw_query_timeout_becomes_error_row() {
        let gateway = RecordGateway::new(Arc::new(HangingStore(MemoryDocumentStore::new())))
            .with_raw_query_timeout(Some(Duration::from_millis(20)));

        let outcome = gateway.raw_query("SELECT pg_sleep(60)").await;
        assert!(outcome.is_failed());
        let rows = outcome.rows();
        assert_eq!(rows.len(), 1);
        let error = rows[0].get("error").and_then(JsonValue::as_str).unwrap();
        assert!(error.contains("timed out"));
    }
}
