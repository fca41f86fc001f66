//! `PostgreSQL` document store.
//!
//! Each collection is a `console.<collection>` table with a `key TEXT` primary
//! key and a JSONB `doc` column. Table names only ever come from
//! [`CollectionKind::as_str`]; keys, documents and limits are always bound.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::types::Json;
use tracing::instrument;

use record_console_core::{CollectionKind, Document};

use super::row_json::row_to_json;
use super::{DocumentStore, StoreError};

/// Embedded migrations from `crates/admin/migrations/`.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run the embedded migrations against `pool`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Qualified table name for a collection.
fn table(kind: CollectionKind) -> String {
    format!("console.{}", kind.as_str())
}

/// Clamp a `u64` into the `BIGINT` range used for `LIMIT`/`OFFSET`.
fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Document store backed by a shared `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self), fields(collection = %kind))]
    async fn get(&self, kind: CollectionKind, key: &str) -> Result<Document, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE key = $1", table(kind));
        let doc: Option<Json<Document>> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        doc.map(|Json(doc)| doc).ok_or_else(|| StoreError::NotFound {
            collection: kind,
            key: key.to_string(),
        })
    }

    #[instrument(skip(self, document), fields(collection = %kind))]
    async fn upsert(
        &self,
        kind: CollectionKind,
        key: &str,
        document: &Document,
    ) -> Result<(), StoreError> {
        let sql = format!(
            r"
            INSERT INTO {} (key, doc, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET doc = EXCLUDED.doc, updated_at = NOW()
            ",
            table(kind)
        );
        sqlx::query(&sql)
            .bind(key)
            .bind(Json(document))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self), fields(collection = %kind))]
    async fn remove(&self, kind: CollectionKind, key: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE key = $1", table(kind));
        let result = sqlx::query(&sql).bind(key).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: kind,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %kind))]
    async fn list(
        &self,
        kind: CollectionKind,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let sql = format!("SELECT doc FROM {} LIMIT $1 OFFSET $2", table(kind));
        let docs: Vec<Json<Document>> = sqlx::query_scalar(&sql)
            .bind(to_bigint(limit))
            .bind(to_bigint(offset))
            .fetch_all(&self.pool)
            .await?;

        Ok(docs.into_iter().map(|Json(doc)| doc).collect())
    }

    #[instrument(skip(self), fields(collection = %kind))]
    async fn count(&self, kind: CollectionKind) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table(kind));
        let total: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    #[instrument(skip(self), fields(collection = %kind))]
    async fn clear(&self, kind: CollectionKind) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {}", table(kind));
        let result = sqlx::query(&sql).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, text))]
    async fn query(&self, text: &str) -> Result<Vec<JsonValue>, StoreError> {
        let rows = sqlx::query(text)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| row_to_json(row).map_err(StoreError::from))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
