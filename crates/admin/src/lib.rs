//! Winter Gifts admin library.
//!
//! The admin panel manages donations (with status history) and fundraising
//! projects. The router is built here so integration tests can drive it
//! against an in-memory backend and session store.
//!
//! # Security
//!
//! Every page except login and health checks sits behind the admin data
//! gate ([`middleware::RequireAdminAuth`]). `viewer` admins can read but not
//! mutate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::services::ServeDir;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the admin application with its session and header middleware.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
