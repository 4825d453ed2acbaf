//! Donation repository for database operations.
//!
//! Status history lives in `app.donation_status_change`; every status write
//! goes through [`DonationRepository::set_status`] so the history and the
//! current status never disagree.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use winter_gifts_core::{
    AdminUserId, CurrencyCode, Donation, DonationEdit, DonationId, DonationStatus, Email,
    ProjectId, StatusChange,
};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DonationRow {
    id: i32,
    project_id: Option<i32>,
    donor_name: String,
    email: String,
    amount: Decimal,
    currency: String,
    message: Option<String>,
    status: DonationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DonationRow {
    fn into_donation(self, history: Vec<StatusChange>) -> Result<Donation, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let currency: CurrencyCode = self
            .currency
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Donation {
            id: DonationId::new(self.id),
            project_id: self.project_id.map(ProjectId::new),
            donor_name: self.donor_name,
            email,
            amount: self.amount,
            currency,
            message: self.message,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            history,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusChangeRow {
    donation_id: i32,
    status: DonationStatus,
    note: Option<String>,
    changed_by: Option<i32>,
    changed_at: DateTime<Utc>,
}

impl From<StatusChangeRow> for StatusChange {
    fn from(row: StatusChangeRow) -> Self {
        Self {
            status: row.status,
            note: row.note,
            changed_by: row.changed_by.map(AdminUserId::new),
            changed_at: row.changed_at,
        }
    }
}

const DONATION_COLUMNS: &str = "id, project_id, donor_name, email, amount, currency, message, \
                                status, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for donation database operations.
pub struct DonationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DonationRepository<'a> {
    /// Create a new donation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all donations, newest first, with their status history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<Donation>, RepositoryError> {
        let rows = sqlx::query_as::<_, DonationRow>(&format!(
            "SELECT {DONATION_COLUMNS} FROM app.donation ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let changes = sqlx::query_as::<_, StatusChangeRow>(
            r"
            SELECT donation_id, status, note, changed_by, changed_at
            FROM app.donation_status_change
            ORDER BY changed_at, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut history: HashMap<i32, Vec<StatusChange>> = HashMap::new();
        for change in changes {
            history
                .entry(change.donation_id)
                .or_default()
                .push(change.into());
        }

        rows.into_iter()
            .map(|row| {
                let entries = history.remove(&row.id).unwrap_or_default();
                row.into_donation(entries)
            })
            .collect()
    }

    /// Get one donation with its history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no donation has this id.
    pub async fn get(&self, id: DonationId) -> Result<Donation, RepositoryError> {
        let row = sqlx::query_as::<_, DonationRow>(&format!(
            "SELECT {DONATION_COLUMNS} FROM app.donation WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let history = self.history(id).await?;
        row.into_donation(history)
    }

    async fn history(&self, id: DonationId) -> Result<Vec<StatusChange>, RepositoryError> {
        let rows = sqlx::query_as::<_, StatusChangeRow>(
            r"
            SELECT donation_id, status, note, changed_by, changed_at
            FROM app.donation_status_change
            WHERE donation_id = $1
            ORDER BY changed_at, id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Change a donation's status and append the change to its history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no donation has this id.
    pub async fn set_status(
        &self,
        id: DonationId,
        status: DonationStatus,
        note: Option<&str>,
        changed_by: Option<AdminUserId>,
    ) -> Result<Donation, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE app.donation SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r"
            INSERT INTO app.donation_status_change (donation_id, status, note, changed_by)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id)
        .bind(status)
        .bind(note)
        .bind(changed_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get(id).await
    }

    /// Update donor-provided fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no donation has this id.
    pub async fn update(
        &self,
        id: DonationId,
        edit: &DonationEdit,
    ) -> Result<Donation, RepositoryError> {
        let updated = sqlx::query(
            r"
            UPDATE app.donation
            SET donor_name = $2, email = $3, amount = $4, message = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&edit.donor_name)
        .bind(edit.email.as_str())
        .bind(edit.amount.value())
        .bind(edit.message.as_deref())
        .execute(self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await
    }

    /// Delete a donation and its history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no donation has this id.
    pub async fn delete(&self, id: DonationId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM app.donation WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
