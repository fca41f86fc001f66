//! Database migration command.
//!
//! Migrations live in `crates/admin/migrations/` and are embedded into the
//! binary at build time.

use record_console_admin::db::run_migrations;

use super::{CommandError, connect};

/// Run the console migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let store = connect().await?;

    tracing::info!("Running console migrations...");
    run_migrations(store.pool()).await?;

    tracing::info!("Console migrations complete!");
    Ok(())
}
