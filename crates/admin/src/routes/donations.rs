//! Donations table route handlers.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use winter_gifts_core::{
    Amount, Donation, DonationEdit, DonationId, DonationStatus, Email, ProjectId,
};

use crate::components::data_table::{DataTableConfig, donations_table_config};
use crate::components::{DonationMutation, TableState};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireMutator};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

use super::{
    AdminUserView, is_htmx, mutation_error_message, render_html, store_table, stored_table,
};

/// Build the donations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/donations", get(index))
        .route("/donations/{id}/status", post(set_status))
        .route("/donations/{id}/edit", post(edit))
        .route("/donations/{id}/delete", post(delete))
}

/// `?status=` filter; empty or unknown values show every row.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterQuery {
    pub status: Option<String>,
}

fn parse_filter(raw: Option<&str>) -> Option<DonationStatus> {
    raw.filter(|s| !s.is_empty()).and_then(|s| s.parse().ok())
}

/// One status history entry for templates.
#[derive(Debug, Clone)]
pub struct HistoryView {
    pub status: String,
    pub note: String,
    pub changed_at: String,
}

/// Donation row for templates.
#[derive(Debug, Clone)]
pub struct DonationView {
    pub id: i32,
    pub donor_name: String,
    pub email: String,
    pub amount: String,
    pub amount_value: String,
    pub project: String,
    pub status: String,
    pub status_label: String,
    pub message: String,
    pub created_at: String,
    pub history: Vec<HistoryView>,
}

impl DonationView {
    fn new(donation: &Donation, project_titles: &HashMap<ProjectId, String>) -> Self {
        let project = donation.project_id.map_or_else(
            || "General fund".to_string(),
            |id| {
                project_titles
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("Project #{id}"))
            },
        );

        Self {
            id: donation.id.as_i32(),
            donor_name: donation.donor_name.clone(),
            email: donation.email.to_string(),
            amount: donation.display_amount(),
            amount_value: donation.amount.to_string(),
            project,
            status: donation.status.as_str().to_string(),
            status_label: donation.status.label().to_string(),
            message: donation.message.clone().unwrap_or_default(),
            created_at: donation.created_at.format("%Y-%m-%d %H:%M").to_string(),
            history: donation
                .history
                .iter()
                .map(|change| HistoryView {
                    status: change.status.label().to_string(),
                    note: change.note.clone().unwrap_or_default(),
                    changed_at: change.changed_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect(),
        }
    }
}

/// Status option for the per-row select.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
}

fn status_options() -> Vec<StatusOption> {
    DonationStatus::ALL
        .iter()
        .map(|s| StatusOption {
            value: s.as_str(),
            label: s.label(),
        })
        .collect()
}

/// Donations table fragment (HTMX swap target).
#[derive(Template)]
#[template(path = "donations/_table.html")]
pub struct DonationsTableTemplate {
    pub config: DataTableConfig,
    pub rows: Vec<DonationView>,
    pub total: usize,
    pub filter: String,
    pub statuses: Vec<StatusOption>,
    pub can_mutate: bool,
    pub error: Option<String>,
}

/// Donations page template.
#[derive(Template)]
#[template(path = "donations/index.html")]
pub struct DonationsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub table: DonationsTableTemplate,
}

async fn project_titles(state: &AppState) -> HashMap<ProjectId, String> {
    match state.backend().list_projects().await {
        Ok(projects) => projects.into_iter().map(|p| (p.id, p.title)).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Project titles unavailable for donations table");
            HashMap::new()
        }
    }
}

async fn table_template(
    state: &AppState,
    admin: &CurrentAdmin,
    table: &TableState<Donation>,
    filter: Option<DonationStatus>,
    error: Option<String>,
) -> DonationsTableTemplate {
    let titles = project_titles(state).await;
    let rows = table
        .rows()
        .iter()
        .filter(|d| filter.is_none_or(|status| d.status == status))
        .map(|d| DonationView::new(d, &titles))
        .collect();

    DonationsTableTemplate {
        config: donations_table_config(),
        rows,
        total: table.len(),
        filter: filter.map(|s| s.as_str().to_string()).unwrap_or_default(),
        statuses: status_options(),
        can_mutate: admin.can_mutate(),
        error,
    }
}

/// Donations list page handler.
///
/// The gate has already verified the session; the snapshot fetched here
/// seeds the table view model.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<StatusFilterQuery>,
) -> Result<Response, AppError> {
    let snapshot = state.backend().list_donations().await?;
    let table = TableState::seed(snapshot);
    store_table(&session, session_keys::TABLE_DONATIONS, &table).await?;

    let filter = parse_filter(query.status.as_deref());
    let template = DonationsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/donations".to_string(),
        table: table_template(&state, &admin, &table, filter, None).await,
    };

    Ok(render_html(&template).into_response())
}

/// Run a mutation against the session's table and render the outcome.
async fn reconcile(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    admin: &CurrentAdmin,
    filter: Option<DonationStatus>,
    mutation: Result<DonationMutation, String>,
) -> Result<Response, AppError> {
    let mut table = match stored_table(session, session_keys::TABLE_DONATIONS).await {
        Some(table) => table,
        None => TableState::seed(state.backend().list_donations().await?),
    };

    let error = match mutation {
        Ok(mutation) => {
            let outcome = table
                .commit(mutation.execute(state.backend(), admin.id()))
                .await;
            match outcome {
                Ok(()) => None,
                Err(e) => Some(mutation_error_message(&e, "donation")),
            }
        }
        Err(invalid) => Some(invalid),
    };
    store_table(session, session_keys::TABLE_DONATIONS, &table).await?;

    if is_htmx(headers) {
        let fragment = table_template(state, admin, &table, filter, error).await;
        let trigger = if fragment.error.is_some() {
            "donations-error"
        } else {
            "donations-updated"
        };
        return Ok(([("HX-Trigger", trigger)], render_html(&fragment)).into_response());
    }

    if error.is_none() {
        let target = filter.map_or_else(
            || "/donations".to_string(),
            |s| format!("/donations?status={s}"),
        );
        return Ok(Redirect::to(&target).into_response());
    }

    let template = DonationsIndexTemplate {
        admin_user: AdminUserView::from(admin),
        current_path: "/donations".to_string(),
        table: table_template(state, admin, &table, filter, error).await,
    };
    Ok(render_html(&template).into_response())
}

/// Status change form input.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub filter: String,
}

impl StatusForm {
    fn into_mutation(self, id: DonationId) -> Result<DonationMutation, String> {
        let status: DonationStatus = self
            .status
            .trim()
            .parse()
            .map_err(|e| format!("Invalid status: {e}."))?;
        let note = Some(self.note.trim().to_string()).filter(|n| !n.is_empty());
        Ok(DonationMutation::SetStatus { id, status, note })
    }
}

/// Change a donation's status.
///
/// POST /donations/{id}/status
#[instrument(skip(admin, state, session, headers))]
pub async fn set_status(
    RequireMutator(admin): RequireMutator,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    let filter = parse_filter(Some(&form.filter));
    let mutation = form.into_mutation(DonationId::new(id));
    reconcile(&state, &session, &headers, &admin, filter, mutation).await
}

/// Donation edit form input.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub donor_name: String,
    pub email: String,
    pub amount: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filter: String,
}

impl EditForm {
    fn into_edit(self) -> Result<DonationEdit, String> {
        let donor_name = self.donor_name.trim().to_string();
        if donor_name.is_empty() {
            return Err("Donor name cannot be empty.".to_string());
        }
        let email = Email::parse(&self.email).map_err(|e| format!("Invalid email: {e}."))?;
        let amount = Amount::parse(&self.amount).map_err(|e| format!("Invalid amount: {e}."))?;
        let message = Some(self.message.trim().to_string()).filter(|m| !m.is_empty());

        Ok(DonationEdit {
            donor_name,
            email,
            amount,
            message,
        })
    }
}

/// Edit a donation's donor-provided fields.
///
/// POST /donations/{id}/edit
#[instrument(skip(admin, state, session, headers, form))]
pub async fn edit(
    RequireMutator(admin): RequireMutator,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Form(form): Form<EditForm>,
) -> Result<Response, AppError> {
    let filter = parse_filter(Some(&form.filter));
    let mutation = form.into_edit().map(|edit| DonationMutation::Edit {
        id: DonationId::new(id),
        edit,
    });
    reconcile(&state, &session, &headers, &admin, filter, mutation).await
}

/// Hidden filter field carried by delete forms.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub filter: String,
}

/// Delete a donation.
///
/// POST /donations/{id}/delete
#[instrument(skip(admin, state, session, headers))]
pub async fn delete(
    RequireMutator(admin): RequireMutator,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Form(form): Form<FilterForm>,
) -> Result<Response, AppError> {
    let mutation = DonationMutation::Delete {
        id: DonationId::new(id),
    };
    let filter = parse_filter(Some(&form.filter));
    reconcile(&state, &session, &headers, &admin, filter, Ok(mutation)).await
}
