//! Reusable admin table building blocks.

pub mod data_table;
pub mod mutations;
pub mod table_state;

pub use mutations::{DonationMutation, ProjectMutation};
pub use table_state::{Reconcile, TableRow, TableState};
