//! Admin table view model.
//!
//! A table is seeded once from a backend snapshot. After that, rows change
//! only through [`TableState::commit`], which awaits a backend mutation and
//! applies its [`Reconcile`] result locally. A failed mutation returns the
//! error and leaves every row exactly as it was; nothing is applied ahead of
//! the backend's answer.

use std::fmt::Debug;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use winter_gifts_core::{BackendError, Donation, DonationId, Project, ProjectId};

/// A record that can be shown as a table row.
pub trait TableRow: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Debug + Serialize + DeserializeOwned;

    fn row_id(&self) -> Self::Id;
}

impl TableRow for Donation {
    type Id = DonationId;

    fn row_id(&self) -> DonationId {
        self.id
    }
}

impl TableRow for Project {
    type Id = ProjectId;

    fn row_id(&self) -> ProjectId {
        self.id
    }
}

/// How a successful mutation changes the local rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile<R: TableRow> {
    /// Replace the row with the same id, or insert it at the top.
    Upsert(R),
    /// Drop the row with this id.
    Remove(R::Id),
}

/// Rows currently shown in one admin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "R: TableRow")]
pub struct TableState<R> {
    rows: Vec<R>,
}

impl<R: TableRow> TableState<R> {
    /// Seed the table from a backend snapshot, keeping its order.
    #[must_use]
    pub const fn seed(snapshot: Vec<R>) -> Self {
        Self { rows: snapshot }
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row with the given id, if present.
    #[must_use]
    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.rows.iter().find(|row| row.row_id() == id)
    }

    /// Apply a confirmed change.
    pub fn apply(&mut self, change: Reconcile<R>) {
        match change {
            Reconcile::Upsert(row) => {
                let id = row.row_id();
                match self.rows.iter_mut().find(|r| r.row_id() == id) {
                    Some(existing) => *existing = row,
                    None => self.rows.insert(0, row),
                }
            }
            Reconcile::Remove(id) => self.rows.retain(|r| r.row_id() != id),
        }
    }

    /// Await a backend mutation and reconcile its result.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged; the rows are left untouched.
    pub async fn commit<F>(&mut self, mutation: F) -> Result<(), BackendError>
    where
        F: Future<Output = Result<Reconcile<R>, BackendError>>,
    {
        let change = mutation.await?;
        self.apply(change);
        Ok(())
    }
}

impl<R> Default for TableState<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn project(id: i32, title: &str) -> Project {
        Project {
            id: ProjectId::new(id),
            slug: format!("p-{id}"),
            title: title.to_string(),
            summary: String::new(),
            goal_amount: Decimal::new(1000, 0),
            raised_amount: Decimal::ZERO,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn titles(state: &TableState<Project>) -> Vec<&str> {
        state.rows().iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut state = TableState::seed(vec![project(1, "a"), project(2, "b")]);
        state.apply(Reconcile::Upsert(project(2, "b2")));
        assert_eq!(titles(&state), ["a", "b2"]);
    }

    #[test]
    fn test_upsert_inserts_new_rows_at_top() {
        let mut state = TableState::seed(vec![project(1, "a")]);
        state.apply(Reconcile::Upsert(project(3, "c")));
        assert_eq!(titles(&state), ["c", "a"]);
    }

    #[test]
    fn test_remove() {
        let mut state = TableState::seed(vec![project(1, "a"), project(2, "b")]);
        state.apply(Reconcile::Remove(ProjectId::new(1)));
        assert_eq!(titles(&state), ["b"]);
        state.apply(Reconcile::Remove(ProjectId::new(9)));
        assert_eq!(state.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_rows() {
        let mut state = TableState::seed(vec![project(1, "a"), project(2, "b")]);
        let before = state.clone();

        let err = state
            .commit(async { Err(BackendError::Unavailable("down".to_string())) })
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Unavailable(_)));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_successful_commit_applies() {
        let mut state = TableState::seed(vec![project(1, "a")]);
        state
            .commit(async { Ok(Reconcile::Upsert(project(1, "renamed"))) })
            .await
            .unwrap();
        assert_eq!(titles(&state), ["renamed"]);
    }

    #[test]
    fn test_session_roundtrip_keeps_order() {
        let state = TableState::seed(vec![project(2, "b"), project(1, "a")]);
        let json = serde_json::to_value(&state).unwrap();
        let back: TableState<Project> = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
