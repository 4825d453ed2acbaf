//! Pledge intake.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use winter_gifts_core::{Donation, DonationId, DonationStatus, NewDonation, StatusChange};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct InsertedRow {
    id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Repository for donations submitted on the site.
pub struct DonationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DonationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a `pending` donation and its first history entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either insert fails; nothing
    /// is written in that case.
    pub async fn create(&self, donation: NewDonation) -> Result<Donation, RepositoryError> {
        let status = DonationStatus::Pending;
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, InsertedRow>(
            r"
            INSERT INTO app.donation
                (project_id, donor_name, email, amount, currency, message, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at, updated_at
            ",
        )
        .bind(donation.project_id)
        .bind(&donation.donor_name)
        .bind(&donation.email)
        .bind(donation.amount.value())
        .bind(donation.currency.code())
        .bind(&donation.message)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO app.donation_status_change (donation_id, status, changed_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(row.id)
        .bind(status)
        .bind(row.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Donation {
            id: DonationId::new(row.id),
            project_id: donation.project_id,
            donor_name: donation.donor_name,
            email: donation.email,
            amount: donation.amount.value(),
            currency: donation.currency,
            message: donation.message,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            history: vec![StatusChange {
                status,
                note: None,
                changed_by: None,
                changed_at: row.created_at,
            }],
        })
    }
}
