//! Winter Gifts Site - public localized donation site.
//!
//! Serves the public site (port 3000 by default). Startup fails if a message
//! catalog is incomplete or the children content file cannot be read.
//! Migrations are not applied here; run `wg-cli migrate` first.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use winter_gifts_site::config::SiteConfig;
use winter_gifts_site::content::load_gift_content;
use winter_gifts_site::db::{self, PgBackend};
use winter_gifts_site::i18n::Catalogs;
use winter_gifts_site::state::AppState;
use winter_gifts_site::telemetry;

#[tokio::main]
async fn main() {
    let config = SiteConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing();

    let catalogs = Catalogs::load(&config.locales).expect("Invalid message catalogs");
    tracing::info!(
        locales = config.locales.supported().len(),
        default = %config.locales.default_locale(),
        "Message catalogs validated"
    );
    let gifts = load_gift_content(&config.children_file()).expect("Failed to load gift content");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let addr = config.socket_addr();
    let state = AppState::new(config, Arc::new(PgBackend::new(pool)), catalogs, gifts);
    let app = telemetry::instrument(winter_gifts_site::app(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "site listening");

    // Peer addresses feed the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(telemetry::shutdown_signal())
    .await
    .expect("Server error");
}
