//! Document store access.
//!
//! # Store Model
//!
//! The console talks to a document store through [`DocumentStore`]: five
//! named collections of schemaless JSON documents, each addressed by a string
//! key, plus a store-native query language for the query console.
//!
//! ## Backends
//!
//! - [`PgDocumentStore`] - `PostgreSQL`, one `console.<collection>` table of
//!   JSONB documents per collection
//! - [`MemoryDocumentStore`] - in-process maps, used by tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p record-console-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;
mod row_json;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use record_console_core::{CollectionKind, Document};

pub use memory::MemoryDocumentStore;
pub use postgres::{PgDocumentStore, run_migrations};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists at the given key.
    #[error("document not found: {collection}/{key}")]
    NotFound {
        collection: CollectionKind,
        key: String,
    },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored document could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A store-native query was rejected or is unsupported.
    #[error("query error: {0}")]
    Query(String),

    /// The store did not answer within the configured time.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Whether this error means the addressed document does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Key-addressed access to the document collections.
///
/// Writes are atomic per key only; nothing here spans more than one document.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetch one document.
    ///
    /// Returns `StoreError::NotFound` if the key is absent.
    async fn get(&self, kind: CollectionKind, key: &str) -> Result<Document, StoreError>;

    /// Create or fully replace the document at `key`.
    async fn upsert(
        &self,
        kind: CollectionKind,
        key: &str,
        document: &Document,
    ) -> Result<(), StoreError>;

    /// Remove the document at `key`.
    ///
    /// Returns `StoreError::NotFound` if the key is absent.
    async fn remove(&self, kind: CollectionKind, key: &str) -> Result<(), StoreError>;

    /// Fetch up to `limit` documents after skipping `offset`, in the store's
    /// native order. Past the end yields an empty vec.
    async fn list(
        &self,
        kind: CollectionKind,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Document>, StoreError>;

    /// Count the documents in a collection.
    async fn count(&self, kind: CollectionKind) -> Result<u64, StoreError>;

    /// Delete every document in a collection, returning how many were removed.
    async fn clear(&self, kind: CollectionKind) -> Result<u64, StoreError>;

    /// Run a store-native query and return its rows as JSON objects.
    async fn query(&self, text: &str) -> Result<Vec<JsonValue>, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
