//! Per-collection record counts.

use record_console_admin::db::DocumentStore;
use record_console_core::CollectionKind;

use super::{CommandError, connect};

/// Print the number of records in each collection.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a count fails.
pub async fn run() -> Result<(), CommandError> {
    let store = connect().await?;

    for kind in CollectionKind::ALL {
        let count = store.count(kind).await?;
        #[allow(clippy::print_stdout)]
        {
            println!("{:<12} {count}", kind.as_str());
        }
    }
    Ok(())
}
