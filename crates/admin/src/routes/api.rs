//! JSON endpoints behind the admin gate.
//!
//! Paths under `/api/` answer `401` instead of redirecting when the session
//! is missing.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use winter_gifts_core::{Donation, Project};

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/donations", get(donations))
        .route("/api/projects", get(projects))
}

/// GET /api/donations
#[instrument(skip_all)]
async fn donations(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Donation>>, AppError> {
    Ok(Json(state.backend().list_donations().await?))
}

/// GET /api/projects
#[instrument(skip_all)]
async fn projects(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.backend().list_projects().await?))
}
