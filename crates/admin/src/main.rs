//! Winter Gifts Admin - donation and project administration panel.
//!
//! Serves the admin panel (port 3001 by default) behind the admin data gate.
//! Migrations are not applied here; run `wg-cli migrate` first.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use winter_gifts_admin::config::AdminConfig;
use winter_gifts_admin::db::{self, PgBackend};
use winter_gifts_admin::middleware::{create_session_layer, create_session_store};
use winter_gifts_admin::state::AppState;
use winter_gifts_admin::telemetry;

#[tokio::main]
async fn main() {
    let config = AdminConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let store = create_session_store(&pool).expect("Failed to create session store");
    let session_layer = create_session_layer(store, &config);

    let backend = Arc::new(PgBackend::new(pool, config.session_ttl()));
    let addr = config.socket_addr();
    let app = telemetry::instrument(winter_gifts_admin::app(
        AppState::new(config, backend),
        session_layer,
    ));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "admin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await
        .expect("Server error");
}
