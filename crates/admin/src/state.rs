//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::RawQueryConfig;
use crate::db::DocumentStore;
use crate::gateway::RecordGateway;

/// Application state shared across all handlers.
///
/// Cheap to clone; the store session is created once at startup and shared.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    gateway: RecordGateway,
    raw_query: RawQueryConfig,
}

impl AppState {
    /// Build state around a store session.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, raw_query: RawQueryConfig) -> Self {
        let gateway = RecordGateway::new(store).with_raw_query_timeout(raw_query.timeout);
        Self {
            inner: Arc::new(AppStateInner { gateway, raw_query }),
        }
    }

    /// The record gateway.
    #[must_use]
    pub fn gateway(&self) -> &RecordGateway {
        &self.inner.gateway
    }

    /// Whether the query console may execute statements.
    #[must_use]
    pub fn raw_query_enabled(&self) -> bool {
        self.inner.raw_query.enabled
    }
}
