//! CLI subcommands.

pub mod migrate;
pub mod query;
pub mod seed;
pub mod stats;

use thiserror::Error;

use record_console_admin::config::{ConfigError, ConsoleConfig};
use record_console_admin::db::{self, PgDocumentStore, StoreError};

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Failed(String),
}

/// Connect to the console database using the server's configuration.
async fn connect() -> Result<PgDocumentStore, CommandError> {
    let config = ConsoleConfig::from_env()?;

    tracing::info!("Connecting to console database...");
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    Ok(PgDocumentStore::new(pool))
}
