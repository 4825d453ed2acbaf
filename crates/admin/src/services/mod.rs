//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password login and backend session tokens

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService};
