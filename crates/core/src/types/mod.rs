//! Core types for Winter Gifts.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod donation;
pub mod email;
pub mod id;
pub mod money;
pub mod project;
pub mod status;

pub use donation::{Donation, DonationEdit, NewDonation, StatusChange};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Amount, AmountError, CurrencyCode, format_decimal};
pub use project::{Project, ProjectDraft, ProjectDraftError, slugify};
pub use status::*;
