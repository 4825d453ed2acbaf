//! Authentication route handlers for admin.
//!
//! Email + password login. The backend checks the password and issues a
//! token; the token and the admin's identity are kept in the session record.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use winter_gifts_core::Email;

use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::middleware::{set_current_admin, stored_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::render_html;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    email: String,
    error: Option<String>,
}

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// Hand-written so the password never reaches logs.
impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page() -> impl IntoResponse {
    render_html(&LoginPageTemplate {
        email: String::new(),
        error: None,
    })
}

fn login_failed(status: StatusCode, email: String, message: &str) -> Response {
    (
        status,
        render_html(&LoginPageTemplate {
            email,
            error: Some(message.to_string()),
        }),
    )
        .into_response()
}

/// Verify credentials and open a session.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(login_failed(
            StatusCode::UNAUTHORIZED,
            form.email,
            INVALID_CREDENTIALS,
        ));
    };

    match state.backend().sign_in(&email, &form.password).await {
        Ok(Some(grant)) => {
            let admin = CurrentAdmin {
                identity: grant.identity,
                token: grant.token,
            };
            set_current_admin(&session, &admin).await?;
            tracing::info!(admin_id = %admin.id(), "Admin signed in");
            Ok(Redirect::to("/donations").into_response())
        }
        Ok(None) => Ok(login_failed(
            StatusCode::UNAUTHORIZED,
            form.email,
            INVALID_CREDENTIALS,
        )),
        Err(e) => {
            tracing::error!(error = %e, "Admin sign-in failed");
            Ok(login_failed(
                StatusCode::SERVICE_UNAVAILABLE,
                form.email,
                "Sign-in is temporarily unavailable. Please try again.",
            ))
        }
    }
}

/// Revoke the backend token and clear the session.
///
/// POST /auth/logout
#[instrument(skip_all)]
async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect, AppError> {
    if let Some(admin) = stored_admin(&session).await {
        if let Err(e) = state.backend().sign_out(&admin.token).await {
            tracing::warn!(error = %e, admin_id = %admin.id(), "Failed to revoke admin token");
        }
        tracing::info!(admin_id = %admin.id(), "Admin signed out");
    }

    session.flush().await?;
    clear_sentry_user();

    Ok(Redirect::to("/auth/login"))
}
