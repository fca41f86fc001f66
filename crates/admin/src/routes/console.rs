//! Query console route handlers.
//!
//! The console executes whatever statement it is given against the store,
//! reads and writes alike. It can be switched off with
//! `CONSOLE_RAW_QUERY_ENABLED=false`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::instrument;

use record_console_core::display_value;

use crate::{error::AppError, filters, gateway::QueryOutcome, state::AppState};

use super::{NavLink, nav_links};

/// Column used for rows that are not JSON objects.
const SCALAR_COLUMN: &str = "value";

/// Query console form input.
#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub query: String,
}

/// Query results flattened into a table.
///
/// Columns are the union of all row keys in first-seen order; a row missing a
/// column gets an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// The result is the single error row produced by a failed query.
    pub is_error: bool,
}

impl ResultTable {
    /// Table for a console query outcome.
    #[must_use]
    pub fn from_outcome(outcome: &QueryOutcome) -> Self {
        Self {
            is_error: outcome.is_failed(),
            ..Self::from_rows(outcome.rows())
        }
    }

    /// Flatten raw query rows for display.
    #[must_use]
    pub fn from_rows(rows: &[JsonValue]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            match row {
                JsonValue::Object(map) => {
                    for name in map.keys() {
                        if !columns.contains(name) {
                            columns.push(name.clone());
                        }
                    }
                }
                _ => {
                    if !columns.iter().any(|c| c == SCALAR_COLUMN) {
                        columns.push(SCALAR_COLUMN.to_string());
                    }
                }
            }
        }

        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| match row {
                        JsonValue::Object(map) => map.get(column).map(display_value).unwrap_or_default(),
                        other if column == SCALAR_COLUMN => display_value(other),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();

        Self {
            columns,
            rows: cells,
            is_error: false,
        }
    }
}

/// Query console page template.
#[derive(Template, WebTemplate)]
#[template(path = "console.html")]
pub struct ConsoleTemplate {
    pub nav: Vec<NavLink>,
    pub query: Option<String>,
    pub enabled: bool,
    pub table: ResultTable,
}

/// Empty query console.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> ConsoleTemplate {
    ConsoleTemplate {
        nav: nav_links(None),
        query: None,
        enabled: state.raw_query_enabled(),
        table: ResultTable::default(),
    }
}

/// Run a query and render its rows, or a single error row.
#[instrument(skip_all)]
pub async fn run_query(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Result<ConsoleTemplate, AppError> {
    if !state.raw_query_enabled() {
        return Err(AppError::Forbidden(
            "the query console is disabled".to_string(),
        ));
    }

    let outcome = state.gateway().raw_query(&form.query).await;
    tracing::info!(
        rows = outcome.rows().len(),
        failed = outcome.is_failed(),
        "Console query executed"
    );

    Ok(ConsoleTemplate {
        nav: nav_links(None),
        query: Some(form.query),
        enabled: true,
        table: ResultTable::from_outcome(&outcome),
    })
}
