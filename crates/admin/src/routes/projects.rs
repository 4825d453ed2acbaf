//! Projects table route handlers.

use std::str::FromStr;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use winter_gifts_core::{CurrencyCode, Project, ProjectDraft, ProjectId, format_decimal};

use crate::components::data_table::{DataTableConfig, projects_table_config};
use crate::components::{ProjectMutation, TableState};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireMutator};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

use super::{
    AdminUserView, is_htmx, mutation_error_message, render_html, store_table, stored_table,
};

/// Build the projects router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(index).post(create))
        .route("/projects/{id}/update", post(update))
        .route("/projects/{id}/delete", post(delete))
}

/// Project row for templates.
#[derive(Debug, Clone)]
pub struct ProjectView {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub goal: String,
    pub goal_value: String,
    pub raised: String,
    pub progress: u8,
    pub published: bool,
}

impl From<&Project> for ProjectView {
    fn from(project: &Project) -> Self {
        let currency = CurrencyCode::default();
        Self {
            id: project.id.as_i32(),
            slug: project.slug.clone(),
            title: project.title.clone(),
            summary: project.summary.clone(),
            goal: currency.format(project.goal_amount),
            goal_value: format_decimal(project.goal_amount),
            raised: currency.format(project.raised_amount),
            progress: project.progress_percent(),
            published: project.published,
        }
    }
}

/// Projects table fragment (HTMX swap target).
#[derive(Template)]
#[template(path = "projects/_table.html")]
pub struct ProjectsTableTemplate {
    pub config: DataTableConfig,
    pub rows: Vec<ProjectView>,
    pub can_mutate: bool,
    pub error: Option<String>,
}

/// Projects page template.
#[derive(Template)]
#[template(path = "projects/index.html")]
pub struct ProjectsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub table: ProjectsTableTemplate,
}

fn table_template(
    admin: &CurrentAdmin,
    table: &TableState<Project>,
    error: Option<String>,
) -> ProjectsTableTemplate {
    ProjectsTableTemplate {
        config: projects_table_config(),
        rows: table.rows().iter().map(ProjectView::from).collect(),
        can_mutate: admin.can_mutate(),
        error,
    }
}

/// Projects list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let snapshot = state.backend().list_projects().await?;
    let table = TableState::seed(snapshot);
    store_table(&session, session_keys::TABLE_PROJECTS, &table).await?;

    let template = ProjectsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/projects".to_string(),
        table: table_template(&admin, &table, None),
    };

    Ok(render_html(&template).into_response())
}

async fn reconcile(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    admin: &CurrentAdmin,
    mutation: Result<ProjectMutation, String>,
) -> Result<Response, AppError> {
    let mut table = match stored_table(session, session_keys::TABLE_PROJECTS).await {
        Some(table) => table,
        None => TableState::seed(state.backend().list_projects().await?),
    };

    let error = match mutation {
        Ok(mutation) => match table.commit(mutation.execute(state.backend())).await {
            Ok(()) => None,
            Err(e) => Some(mutation_error_message(&e, "project")),
        },
        Err(invalid) => Some(invalid),
    };
    store_table(session, session_keys::TABLE_PROJECTS, &table).await?;

    if is_htmx(headers) {
        let trigger = if error.is_some() {
            "projects-error"
        } else {
            "projects-updated"
        };
        let fragment = table_template(admin, &table, error);
        return Ok(([("HX-Trigger", trigger)], render_html(&fragment)).into_response());
    }

    if error.is_none() {
        return Ok(Redirect::to("/projects").into_response());
    }

    let template = ProjectsIndexTemplate {
        admin_user: AdminUserView::from(admin),
        current_path: "/projects".to_string(),
        table: table_template(admin, &table, error),
    };
    Ok(render_html(&template).into_response())
}

/// Project create/update form input.
#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    pub goal_amount: String,
    /// Checkbox: present when ticked.
    pub published: Option<String>,
}

impl ProjectForm {
    fn into_draft(self) -> Result<ProjectDraft, String> {
        let goal = Decimal::from_str(self.goal_amount.trim())
            .map_err(|_| "Goal amount must be a number.".to_string())?;

        ProjectDraft::new(
            Some(self.slug.as_str()),
            &self.title,
            &self.summary,
            goal,
            self.published.is_some(),
        )
        .map_err(|e| format!("Invalid project: {e}."))
    }
}

/// Create a project.
///
/// POST /projects
#[instrument(skip(admin, state, session, headers))]
pub async fn create(
    RequireMutator(admin): RequireMutator,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ProjectForm>,
) -> Result<Response, AppError> {
    let mutation = form.into_draft().map(ProjectMutation::Create);
    reconcile(&state, &session, &headers, &admin, mutation).await
}

/// Update a project.
///
/// POST /projects/{id}/update
#[instrument(skip(admin, state, session, headers))]
pub async fn update(
    RequireMutator(admin): RequireMutator,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Form(form): Form<ProjectForm>,
) -> Result<Response, AppError> {
    let mutation = form.into_draft().map(|draft| ProjectMutation::Update {
        id: ProjectId::new(id),
        draft,
    });
    reconcile(&state, &session, &headers, &admin, mutation).await
}

/// Delete a project. Its donations stay, without a project.
///
/// POST /projects/{id}/delete
#[instrument(skip(admin, state, session, headers))]
pub async fn delete(
    RequireMutator(admin): RequireMutator,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let mutation = ProjectMutation::Delete {
        id: ProjectId::new(id),
    };
    reconcile(&state, &session, &headers, &admin, Ok(mutation)).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(title: &str, slug: &str, goal: &str, published: bool) -> ProjectForm {
        ProjectForm {
            title: title.to_string(),
            slug: slug.to_string(),
            summary: "Warm boots".to_string(),
            goal_amount: goal.to_string(),
            published: published.then(|| "on".to_string()),
        }
    }

    #[test]
    fn test_form_derives_slug() {
        let draft = form("Winter Boots 2026", "", "1500", true)
            .into_draft()
            .unwrap();
        assert_eq!(draft.slug, "winter-boots-2026");
        assert!(draft.published);
        assert_eq!(draft.goal_amount, Decimal::new(1500, 0));
    }

    #[test]
    fn test_form_rejects_bad_goal() {
        assert!(form("Boots", "", "lots", false).into_draft().is_err());
        assert!(form("Boots", "", "-1", false).into_draft().is_err());
        assert!(form("", "", "10", false).into_draft().is_err());
    }
}
