use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ApprovalStatus, Record, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("corrupt {table} row {id}: {reason}")]
    Corrupt {
        table: &'static str,
        id: u64,
        reason: String,
    },
}

/// Result of asking the store to decide on a record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transition {
    /// The record was pending and now carries the new status.
    Applied,
    /// The record had already been decided; it was left untouched.
    AlreadyDecided(ApprovalStatus),
    /// No record with that id.
    Missing,
}

/// Read-only access to provisioned users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;
}

/// Single-row CRUD over one record kind.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Inserts a pending record owned by `owner` and returns its id.
    async fn insert(&self, owner: u64, draft: R::Draft) -> Result<u64, StoreError>;

    /// Deletes the record only when `owner` owns it (and, for kinds that lock
    /// after a decision, only while pending). Returns whether a row went away.
    async fn delete_if_owner(&self, id: u64, owner: u64) -> Result<bool, StoreError>;

    /// Moves a pending record to `status`.
    async fn update_status(
        &self,
        id: u64,
        status: ApprovalStatus,
        approver: u64,
    ) -> Result<Transition, StoreError>;

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<R>, StoreError>;

    async fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<R>, StoreError>;
}
