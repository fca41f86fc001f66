//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (store ping)
//!
//! # Query console
//! GET  /                                 - Query form
//! POST /                                 - Run a store-native query
//!
//! # Records (collection = users|categories|products|orders|order_items)
//! GET  /{collection}?page=&per_page=     - Paginated list
//! GET  /create/{collection}              - Create form
//! POST /create/{collection}              - Upsert, redirect to list
//! GET  /update/{collection}/{key}        - Edit form with current values
//! POST /update/{collection}/{key}        - Upsert at key, redirect to list
//! GET  /delete/{collection}/{key}        - Delete confirmation
//! POST /delete/{collection}/{key}        - Remove, redirect to list
//! ```

pub mod console;
pub mod health;
pub mod records;

use axum::{Router, routing::get};

use record_console_core::CollectionKind;

use crate::error::AppError;
use crate::state::AppState;

/// Navigation entry rendered in the page header.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

/// Header navigation: the console plus one link per collection.
#[must_use]
pub fn nav_links(current: Option<CollectionKind>) -> Vec<NavLink> {
    std::iter::once(NavLink {
        href: "/".to_string(),
        label: "Query",
        active: current.is_none(),
    })
    .chain(CollectionKind::ALL.into_iter().map(|kind| NavLink {
        href: kind.list_path(),
        label: kind.label(),
        active: current == Some(kind),
    }))
    .collect()
}

/// Resolve a `{collection}` path segment.
///
/// # Errors
///
/// Returns `AppError::UnknownCollection` for anything but the five collection names.
pub fn parse_collection(segment: &str) -> Result<CollectionKind, AppError> {
    Ok(segment.parse()?)
}

/// Create all routes for the console.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Query console
        .route("/", get(console::index).post(console::run_query))
        // Records
        .route("/{collection}", get(records::index))
        .route(
            "/create/{collection}",
            get(records::create_form).post(records::create),
        )
        .route(
            "/update/{collection}/{key}",
            get(records::edit_form).post(records::update),
        )
        .route(
            "/delete/{collection}/{key}",
            get(records::delete_confirm).post(records::delete),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_links_mark_current() {
        let links = nav_links(Some(CollectionKind::Products));
        assert_eq!(links.len(), 6);
        let active: Vec<&str> = links.iter().filter(|l| l.active).map(|l| l.label).collect();
        assert_eq!(active, vec!["Products"]);
    }

    #[test]
    fn test_nav_links_console_active_by_default() {
        let links = nav_links(None);
        assert!(links.first().is_some_and(|l| l.active && l.href == "/"));
    }

    #[test]
    fn test_parse_collection_unknown() {
        assert!(matches!(
            parse_collection("widgets"),
            Err(AppError::UnknownCollection(_))
        ));
    }
}
