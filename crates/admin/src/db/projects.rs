//! Project repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use winter_gifts_core::{Project, ProjectDraft, ProjectId};

use super::RepositoryError;

/// Internal row type for project queries.
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    slug: String,
    title: String,
    summary: String,
    goal_amount: Decimal,
    raised_amount: Decimal,
    published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: ProjectId::new(row.id),
            slug: row.slug,
            title: row.title,
            summary: row.summary,
            goal_amount: row.goal_amount,
            raised_amount: row.raised_amount,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// Raised totals only count donations that have been confirmed or later.
const PROJECT_SELECT: &str = r"
    SELECT p.id, p.slug, p.title, p.summary, p.goal_amount, p.published,
           p.created_at, p.updated_at,
           COALESCE((
               SELECT SUM(d.amount) FROM app.donation d
               WHERE d.project_id = p.id
                 AND d.status IN ('confirmed', 'purchased', 'delivered')
           ), 0) AS raised_amount
    FROM app.project p
";

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "{PROJECT_SELECT} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a project by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no project has this id.
    pub async fn get(&self, id: ProjectId) -> Result<Project, RepositoryError> {
        sqlx::query_as::<_, ProjectRow>(&format!("{PROJECT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Into::into)
            .ok_or(RepositoryError::NotFound)
    }

    /// Insert a project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, draft: &ProjectDraft) -> Result<Project, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO app.project (slug, title, summary, goal_amount, published)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&draft.slug)
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(draft.goal_amount)
        .bind(draft.published)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "project slug"))?;

        self.get(ProjectId::new(id)).await
    }

    /// Overwrite a project's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no project has this id and
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Project, RepositoryError> {
        let updated = sqlx::query(
            r"
            UPDATE app.project
            SET slug = $2, title = $3, summary = $4, goal_amount = $5, published = $6,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&draft.slug)
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(draft.goal_amount)
        .bind(draft.published)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "project slug"))?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await
    }

    /// Delete a project. Its donations keep their rows with no project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no project has this id.
    pub async fn delete(&self, id: ProjectId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM app.project WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
