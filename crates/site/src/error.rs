//! Handler error type for the public site.
//!
//! Pages with their own localized failure states (pledge form, subscribe
//! fragment, 404) render those directly; this type covers backend failures
//! that escape them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use winter_gifts_core::BackendError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self::Backend(err) = &self;
        let status = match err {
            BackendError::NotFound(_) => StatusCode::NOT_FOUND,
            BackendError::Conflict(_) => StatusCode::CONFLICT,
            BackendError::Invalid(_) => StatusCode::BAD_REQUEST,
            BackendError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status.is_client_error() {
            return (status, self.to_string()).into_response();
        }

        // Visitors get a generic body; the detail goes to Sentry
        let event_id = sentry::capture_error(&self);
        tracing::error!(error = %self, sentry_event_id = %event_id, "Request error");
        (status, "Internal server error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: BackendError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(BackendError::NotFound("project".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(BackendError::Invalid("amount".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(BackendError::Conflict("email".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_of(BackendError::Unavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
