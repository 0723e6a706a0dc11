use async_trait::async_trait;
use thiserror::Error;

use escola_core::{
    NewProfessor, PopulatedProfessor, Professor, ProfessorId, ProfessorPatch, User, UserId,
};

/// Storage-layer failure.
///
/// The `Display` text is what clients see in `error` bodies, so keep it
/// free of connection strings and credentials.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record violates a schema constraint.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected or failed a query.
    #[error("database error in {operation}: {message}")]
    Database { operation: &'static str, message: String },

    /// The backend could not be reached (pool closed, timeout, poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persisted collection of professor records.
///
/// No operation checks that `user_ref` points at an existing user. Listing
/// is in creation order.
#[async_trait]
pub trait ProfessorStore: Send + Sync {
    /// All professors, with owners expanded.
    async fn list_all(&self) -> Result<Vec<PopulatedProfessor>, StoreError>;

    /// One professor with its owner expanded, or `None`.
    async fn get_by_id(&self, id: ProfessorId) -> Result<Option<PopulatedProfessor>, StoreError>;

    /// Persist under a freshly allocated id and return the stored record.
    async fn create(&self, new: NewProfessor) -> Result<Professor, StoreError>;

    /// Write the supplied fields; `None` if no such record.
    async fn update_by_id(
        &self,
        id: ProfessorId,
        patch: ProfessorPatch,
    ) -> Result<Option<Professor>, StoreError>;

    /// Remove if present. Returns whether a record was removed.
    async fn delete_by_id(&self, id: ProfessorId) -> Result<bool, StoreError>;

    /// Professors owned by `user_id` (owners not expanded).
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Professor>, StoreError>;
}

/// Read-only view of user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}
