//! Run a store-native query from the command line.

use record_console_admin::db::DocumentStore;

use super::{CommandError, connect};

/// Run `text` and print each result row as one line of JSON.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub async fn run(text: &str) -> Result<(), CommandError> {
    let store = connect().await?;

    let rows = store.query(text).await?;
    for row in &rows {
        #[allow(clippy::print_stdout)]
        {
            println!("{row}");
        }
    }
    tracing::info!(rows = rows.len(), "Query complete");
    Ok(())
}
