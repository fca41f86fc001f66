//! Unified error handling for the console.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use record_console_core::{PaginationError, UnknownCollection};

use crate::db::StoreError;

/// What a CRUD route was doing when the store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Creating,
    Updating,
    Deleting,
    Fetching,
}

impl std::fmt::Display for RecordAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Creating => "creating",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
            Self::Fetching => "fetching",
        })
    }
}

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum AppError {
    /// A CRUD store call failed.
    #[error("Error {action} record: {source}")]
    Record {
        action: RecordAction,
        source: StoreError,
    },

    /// Path segment names no known collection.
    #[error(transparent)]
    UnknownCollection(#[from] UnknownCollection),

    /// Pagination parameters out of range.
    #[error("Bad request: {0}")]
    Pagination(#[from] PaginationError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Capability disabled by configuration.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a store failure with the action that triggered it.
    #[must_use]
    pub const fn record(action: RecordAction, source: StoreError) -> Self {
        Self::Record { action, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Record { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
            Self::Record { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnknownCollection(_) => StatusCode::NOT_FOUND,
            Self::Pagination(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Console request error"
            );
        }

        // Admin-only surface: the store's own message is the useful part
        (status, self.to_string()).into_response()
    }
}
