//! Published project reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use winter_gifts_core::{Project, ProjectId};

use super::RepositoryError;

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

// Same raised-amount rule as the admin panel: confirmed or later.
const PUBLISHED_SELECT: &str = r"
    SELECT p.id, p.slug, p.title, p.summary, p.goal_amount, p.published,
           p.created_at, p.updated_at,
           COALESCE((
               SELECT SUM(d.amount) FROM app.donation d
               WHERE d.project_id = p.id
                 AND d.status IN ('confirmed', 'purchased', 'delivered')
           ), 0) AS raised_amount
    FROM app.project p
    WHERE p.published
";

/// Repository for published projects.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "{PUBLISHED_SELECT} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    /// A published project by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_published(&self, slug: &str) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!("{PUBLISHED_SELECT} AND p.slug = $1"))
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Project::from))
    }
}
