//! Donation records and the intents that create or change them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AdminUserId, Amount, CurrencyCode, DonationId, DonationStatus, Email, ProjectId};

/// One entry in a donation's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: DonationStatus,
    pub note: Option<String>,
    pub changed_by: Option<AdminUserId>,
    pub changed_at: DateTime<Utc>,
}

/// A donation as owned by the backend.
///
/// `history` is ordered oldest first and its last entry always matches
/// `status` once the backend has recorded at least one change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub project_id: Option<ProjectId>,
    pub donor_name: String,
    pub email: Email,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub message: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<StatusChange>,
}

impl Donation {
    /// Amount formatted with its currency symbol.
    #[must_use]
    pub fn display_amount(&self) -> String {
        self.currency.format(self.amount)
    }
}

/// A pledge submitted through the public site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub project_id: Option<ProjectId>,
    pub donor_name: String,
    pub email: Email,
    pub amount: Amount,
    pub currency: CurrencyCode,
    pub message: Option<String>,
}

/// Admin edit of a donation's donor-provided fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationEdit {
    pub donor_name: String,
    pub email: Email,
    pub amount: Amount,
    pub message: Option<String>,
}
