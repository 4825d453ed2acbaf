//! Admin data gate.
//!
//! Every admin page and API route takes [`RequireAdminAuth`] (or
//! [`RequireMutator`]) as its first extractor. The check runs before the
//! handler body, so a request without a live session never reaches a backend
//! collection fetch.
//!
//! A session is live when the cookie's record holds a [`CurrentAdmin`] and the
//! backend still recognizes its token.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::set_sentry_user;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Login page that unauthenticated page requests are sent to.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires a live admin session.
///
/// Page requests without one are redirected to the login page; `/api/`
/// requests get `401 Unauthorized`.
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Rejection for the admin gate.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Authenticated, but the role may not mutate.
    Forbidden,
    /// The backend could not verify the token.
    Unavailable,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Viewers cannot change donations or projects",
            )
                .into_response(),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Session could not be verified, try again shortly",
            )
                .into_response(),
        }
    }
}

fn unauthenticated(parts: &Parts) -> AdminAuthRejection {
    if parts.uri.path().starts_with("/api/") {
        AdminAuthRejection::Unauthorized
    } else {
        AdminAuthRejection::RedirectToLogin
    }
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            tracing::error!("Session layer missing from admin router");
            return Err(AdminAuthRejection::Unavailable);
        };

        let Some(admin) = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
        else {
            return Err(unauthenticated(parts));
        };

        match state.backend().current_admin(&admin.token).await {
            Ok(Some(identity)) => {
                set_sentry_user(identity.id, Some(identity.email.as_str()));
                // Role or name may have changed since login
                Ok(Self(CurrentAdmin {
                    identity,
                    token: admin.token,
                }))
            }
            Ok(None) => {
                tracing::info!(admin_id = %admin.id(), "Admin session no longer valid");
                if let Err(e) = session.flush().await {
                    tracing::warn!(error = %e, "Failed to flush stale admin session");
                }
                Err(unauthenticated(parts))
            }
            Err(e) => {
                tracing::error!(error = %e, "Admin session verification failed");
                Err(AdminAuthRejection::Unavailable)
            }
        }
    }
}

/// Extractor for mutation endpoints: a live session whose role may mutate.
pub struct RequireMutator(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireMutator {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdminAuth(admin) = RequireAdminAuth::from_request_parts(parts, state).await?;
        if !admin.can_mutate() {
            tracing::info!(admin_id = %admin.id(), role = %admin.role(), "Mutation refused");
            return Err(AdminAuthRejection::Forbidden);
        }
        Ok(Self(admin))
    }
}

/// Store a freshly signed-in admin in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// The admin stored in the session, without verifying the token.
pub async fn stored_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}
