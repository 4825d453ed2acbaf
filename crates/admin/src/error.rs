//! Handler errors for the admin panel and the Sentry user scope.
//!
//! Auth failures never reach this type; the gate extractors answer those
//! with redirects, 401 or 403 directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use winter_gifts_core::{AdminUserId, BackendError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Reading or writing the cookie session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    /// Status code sent to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Backend(BackendError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Backend(BackendError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Backend(BackendError::Invalid(_)) => StatusCode::BAD_REQUEST,
            Self::Backend(BackendError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !status.is_server_error() {
            return (status, self.to_string()).into_response();
        }

        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            %status,
            sentry_event_id = %event_id,
            "Admin request failed"
        );
        (status, "Internal server error").into_response()
    }
}

/// Tag subsequent Sentry events with the signed-in admin.
pub fn set_sentry_user(admin_user_id: AdminUserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (BackendError::NotFound("donation 12".into()), StatusCode::NOT_FOUND),
            (BackendError::Conflict("slug".into()), StatusCode::CONFLICT),
            (BackendError::Invalid("amount".into()), StatusCode::BAD_REQUEST),
            (BackendError::Unavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::from(BackendError::Invalid("amount".to_string()));
        assert_eq!(err.to_string(), "Backend error: invalid: amount");
    }
}
