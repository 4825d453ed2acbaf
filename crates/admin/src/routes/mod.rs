//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (backend ping)
//!
//! GET  /                            - Redirect to /donations
//!
//! # Auth
//! GET  /auth/login                  - Login page
//! POST /auth/login                  - Verify credentials, open session
//! POST /auth/logout                 - Revoke session
//!
//! # Donations
//! GET  /donations?status=           - Donations table
//! POST /donations/{id}/status       - Change status (appends history)
//! POST /donations/{id}/edit         - Edit donor fields
//! POST /donations/{id}/delete       - Delete donation
//!
//! # Projects
//! GET  /projects                    - Projects table
//! POST /projects                    - Create project
//! POST /projects/{id}/update        - Update project
//! POST /projects/{id}/delete        - Delete project
//!
//! # API (401 instead of redirects)
//! GET  /api/donations               - Donations as JSON
//! GET  /api/projects                - Projects as JSON
//! ```
//!
//! Mutation endpoints answer HTMX requests with the table fragment and plain
//! form posts with a redirect back to the table (or the full page when the
//! mutation failed, so the error banner is visible).

pub mod api;
pub mod auth;
pub mod donations;
pub mod health;
pub mod projects;

use askama::Template;
use axum::{
    Router,
    http::HeaderMap,
    response::{Html, Redirect},
    routing::get,
};
use tower_sessions::Session;

use winter_gifts_core::BackendError;

use crate::components::{TableRow, TableState};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/donations") }))
        .merge(auth::router())
        .merge(donations::router())
        .merge(projects::router())
        .merge(api::router())
        .merge(health::router())
}

/// Signed-in admin as shown in the page header.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub role: String,
    pub can_mutate: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name().to_string(),
            email: admin.identity.email.to_string(),
            role: admin.role().to_string(),
            can_mutate: admin.can_mutate(),
        }
    }
}

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Render a template, logging failures.
pub(crate) fn render_html<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Banner text for a failed mutation.
pub(crate) fn mutation_error_message(err: &BackendError, what: &str) -> String {
    match err {
        BackendError::NotFound(_) => format!("That {what} no longer exists. Nothing was changed."),
        BackendError::Conflict(msg) | BackendError::Invalid(msg) => {
            format!("The {what} could not be saved: {msg}.")
        }
        BackendError::Unavailable(_) => {
            tracing::error!(error = %err, what, "Admin mutation failed");
            "The backend is unavailable. Nothing was changed, please try again.".to_string()
        }
    }
}

/// The table view model stored in the session, if any.
///
/// Unreadable entries are treated as absent so the caller re-seeds.
pub(crate) async fn stored_table<R: TableRow>(
    session: &Session,
    key: &str,
) -> Option<TableState<R>> {
    match session.get::<TableState<R>>(key).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(error = %e, key, "Discarding unreadable table state");
            None
        }
    }
}

/// Persist the table view model for the next request.
pub(crate) async fn store_table<R: TableRow>(
    session: &Session,
    key: &str,
    table: &TableState<R>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(key, table).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_mutation_error_message() {
        let msg = mutation_error_message(&BackendError::NotFound("x".into()), "donation");
        assert!(msg.contains("no longer exists"));

        let msg = mutation_error_message(&BackendError::Conflict("slug taken".into()), "project");
        assert!(msg.contains("slug taken"));
    }
}
