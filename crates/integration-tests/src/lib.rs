//! Integration test harness for Record Console.
//!
//! Drives the full admin router in-process with `tower::ServiceExt::oneshot`
//! over an in-memory document store, so no database or running server is
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p record-console-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use record_console_core::{CollectionKind, Document};

use record_console_admin::config::RawQueryConfig;
use record_console_admin::db::{DocumentStore, MemoryDocumentStore, StoreError};
use record_console_admin::seed::seed_sample_data;
use record_console_admin::state::AppState;

/// A console router plus direct access to its backing store.
pub struct TestConsole {
    pub store: Arc<MemoryDocumentStore>,
    router: Router,
}

/// Status, redirect target and body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestConsole {
    /// Empty store, query console enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_raw_query(RawQueryConfig::default())
    }

    /// Empty store with the given console settings.
    #[must_use]
    pub fn with_raw_query(raw_query: RawQueryConfig) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let shared: Arc<dyn DocumentStore> = store.clone();
        Self::build(store, shared, raw_query)
    }

    /// Empty store whose console queries all return `rows`.
    #[must_use]
    pub fn with_query_rows(rows: Vec<JsonValue>) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let shared: Arc<dyn DocumentStore> = Arc::new(CannedQueryStore {
            inner: store.clone(),
            rows,
        });
        Self::build(store, shared, RawQueryConfig::default())
    }

    fn build(
        store: Arc<MemoryDocumentStore>,
        shared: Arc<dyn DocumentStore>,
        raw_query: RawQueryConfig,
    ) -> Self {
        let router = record_console_admin::app(AppState::new(shared, raw_query));
        Self { store, router }
    }

    /// Store seeded with `count` records per collection.
    pub async fn seeded(count: usize) -> Self {
        let console = Self::new();
        let report = seed_sample_data(console.store.as_ref(), count).await;
        assert!(report.errors.is_empty(), "seeding failed: {:?}", report.errors);
        console
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// `POST uri` with an already-encoded form body.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Memory store that answers every query with a fixed set of rows.
struct CannedQueryStore {
    inner: Arc<MemoryDocumentStore>,
    rows: Vec<JsonValue>,
}

#[async_trait]
impl DocumentStore for CannedQueryStore {
    async fn get(&self, kind: CollectionKind, key: &str) -> Result<Document, StoreError> {
        self.inner.get(kind, key).await
    }

    async fn upsert(
        &self,
        kind: CollectionKind,
        key: &str,
        document: &Document,
    ) -> Result<(), StoreError> {
        self.inner.upsert(kind, key, document).await
    }

    async fn remove(&self, kind: CollectionKind, key: &str) -> Result<(), StoreError> {
        self.inner.remove(kind, key).await
    }

    async fn list(
        &self,
        kind: CollectionKind,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.list(kind, limit, offset).await
    }

    async fn count(&self, kind: CollectionKind) -> Result<u64, StoreError> {
        self.inner.count(kind).await
    }

    async fn clear(&self, kind: CollectionKind) -> Result<u64, StoreError> {
        self.inner.clear(kind).await
    }

    async fn query(&self, _text: &str) -> Result<Vec<JsonValue>, StoreError> {
        Ok(self.rows.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
