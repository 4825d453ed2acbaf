//! Table mutation intents.
//!
//! Each intent runs against the backend and, on success, says how the table
//! view model changes. Handlers feed [`DonationMutation::execute`] and
//! [`ProjectMutation::execute`] into [`TableState::commit`].
//!
//! [`TableState::commit`]: super::table_state::TableState::commit

use winter_gifts_core::backend::{DonationStore, ProjectStore};
use winter_gifts_core::{
    AdminUserId, BackendError, Donation, DonationEdit, DonationId, DonationStatus, Project,
    ProjectDraft, ProjectId,
};

use super::table_state::Reconcile;

/// A change to one donation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationMutation {
    SetStatus {
        id: DonationId,
        status: DonationStatus,
        note: Option<String>,
    },
    Edit {
        id: DonationId,
        edit: DonationEdit,
    },
    Delete {
        id: DonationId,
    },
}

impl DonationMutation {
    /// Send the intent to the backend.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports.
    pub async fn execute<S>(
        self,
        store: &S,
        actor: AdminUserId,
    ) -> Result<Reconcile<Donation>, BackendError>
    where
        S: DonationStore + Sync + ?Sized,
    {
        match self {
            Self::SetStatus { id, status, note } => store
                .set_donation_status(id, status, note, Some(actor))
                .await
                .map(Reconcile::Upsert),
            Self::Edit { id, edit } => store
                .update_donation(id, edit)
                .await
                .map(Reconcile::Upsert),
            Self::Delete { id } => {
                store.delete_donation(id).await?;
                Ok(Reconcile::Remove(id))
            }
        }
    }
}

/// A change to the project list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectMutation {
    Create(ProjectDraft),
    Update { id: ProjectId, draft: ProjectDraft },
    Delete { id: ProjectId },
}

impl ProjectMutation {
    /// Send the intent to the backend.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports.
    pub async fn execute<S>(self, store: &S) -> Result<Reconcile<Project>, BackendError>
    where
        S: ProjectStore + Sync + ?Sized,
    {
        match self {
            Self::Create(draft) => store.create_project(draft).await.map(Reconcile::Upsert),
            Self::Update { id, draft } => store
                .update_project(id, draft)
                .await
                .map(Reconcile::Upsert),
            Self::Delete { id } => {
                store.delete_project(id).await?;
                Ok(Reconcile::Remove(id))
            }
        }
    }
}
