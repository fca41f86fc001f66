//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Longest cell value shown in list tables before truncation.
pub const MAX_CELL_CHARS: usize = 80;

/// Shortens long cell values to [`MAX_CELL_CHARS`] characters plus an ellipsis.
///
/// Usage in templates: `{{ cell|truncate_cell }}`
#[askama::filter_fn]
pub fn truncate_cell(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(truncate_chars(&value.to_string(), MAX_CELL_CHARS))
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => format!("{}…", text.get(..byte_index).unwrap_or(text)),
        None => text.to_string(),
    }
}
