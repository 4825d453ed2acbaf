//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Lifecycle of a donation from pledge to delivered gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.donation_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    /// Pledged on the site, money not yet confirmed.
    #[default]
    Pending,
    /// Payment confirmed by an admin.
    Confirmed,
    /// Gift bought with the donation.
    Purchased,
    /// Gift handed over.
    Delivered,
    /// Pledge withdrawn or refunded.
    Cancelled,
}

impl DonationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Purchased,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire/database code for the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Purchased => "purchased",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label for admin tables.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Purchased => "Purchased",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the donation still counts towards a project's raised amount.
    #[must_use]
    pub const fn counts_as_raised(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Purchased | Self::Delivered)
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid donation status: {s}"))
    }
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin user management.
    SuperAdmin,
    /// Can create, edit and delete donations and projects.
    Admin,
    /// Read-only access to admin tables.
    Viewer,
}

impl AdminRole {
    /// Whether this role may run table mutations.
    #[must_use]
    pub const fn can_mutate(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_status_parse_matches_display() {
        for status in DonationStatus::ALL {
            let parsed: DonationStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("shipped".parse::<DonationStatus>().is_err());
    }

    #[test]
    fn test_donation_status_serde_is_snake_case() {
        let json = serde_json::to_string(&DonationStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
    }

    #[test]
    fn test_counts_as_raised() {
        assert!(!DonationStatus::Pending.counts_as_raised());
        assert!(DonationStatus::Confirmed.counts_as_raised());
        assert!(!DonationStatus::Cancelled.counts_as_raised());
    }

    #[test]
    fn test_admin_role_permissions() {
        assert!(AdminRole::SuperAdmin.can_mutate());
        assert!(AdminRole::Admin.can_mutate());
        assert!(!AdminRole::Viewer.can_mutate());
        assert_eq!("viewer".parse::<AdminRole>().unwrap(), AdminRole::Viewer);
    }
}
