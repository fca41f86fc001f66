//! Record Console admin library.
//!
//! Paginated list, create, update and delete views over five document
//! collections, plus a query console that runs store-native statements.
//! Exposed as a library so the router can be driven from integration tests
//! and the CLI can reuse the store and seeder.
//!
//! # Security
//!
//! The query console runs arbitrary statements, writes included. Only expose
//! this service to trusted operators, or disable the console with
//! `CONSOLE_RAW_QUERY_ENABLED=false`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod routes;
pub mod seed;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router with request tracing.
///
/// Error-tracking layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
