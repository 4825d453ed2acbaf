//! Domain models for admin.
//!
//! Backend records themselves live in `winter_gifts_core`; this module holds
//! what the admin panel keeps in its own session.

pub mod session;

pub use session::{CurrentAdmin, session_keys};
