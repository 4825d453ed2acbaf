//! Winter Gifts Core - Shared types library.
//!
//! This crate provides the pieces shared by every Winter Gifts component:
//! - `site` - Public localized donation site
//! - `admin` - Administration panel for donations and projects
//! - `cli` - Command-line tools for migrations, admin bootstrap and gift reports
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. Backend access is described by the capability traits in
//! [`backend`]; the web crates provide `PostgreSQL` implementations and the
//! tests provide in-memory fakes.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, money, donations and projects
//! - [`locale`] - Supported locales and deterministic locale resolution
//! - [`backend`] - Backend capability traits and their error type
//! - [`gifts`] - Children's gift wish content and aggregate tallies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod gifts;
pub mod locale;
pub mod types;

pub use backend::BackendError;
pub use locale::{Locale, LocaleConfig, LocaleConfigError, LocaleResolver};
pub use types::*;
