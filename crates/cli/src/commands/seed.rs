//! Seed every collection with sample data.

use record_console_admin::seed::seed_sample_data;

use super::{CommandError, connect};

/// Clear all collections and write `count` records to each.
///
/// Individual failures are logged and seeding continues; the command fails
/// at the end if any occurred.
///
/// # Errors
///
/// Returns an error if the database is unreachable or any write failed.
pub async fn run(count: usize) -> Result<(), CommandError> {
    let store = connect().await?;

    let report = seed_sample_data(&store, count).await;
    for (kind, inserted) in &report.inserted {
        tracing::info!(collection = %kind, inserted, "Seeded");
    }

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(CommandError::Failed(format!(
            "seeding finished with {} errors",
            report.errors.len()
        )))
    }
}
