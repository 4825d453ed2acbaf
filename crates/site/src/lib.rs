//! Winter Gifts public site library.
//!
//! Localized pages for fundraising projects, pledge intake and newsletter
//! signup. The router is built here so integration tests can drive it
//! against an in-memory backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod snowfall;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/site/static";

/// Build the site application with its header middleware.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::csp_nonce_middleware))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
