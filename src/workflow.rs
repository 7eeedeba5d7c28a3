//! Approval workflow shared by attendance records and leave requests.
//!
//! Records start `pending`; a team lead moves them to `approved` or
//! `rejected` once. Employees create and delete their own records.

use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::auth::auth::AuthUser;
use crate::db::{RecordStore, StoreError, Transition};
use crate::model::{ApprovalStatus, Record, Role};

/// The `action` field of the index form.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Create,
    Delete,
    Approve,
    Reject,
}

#[derive(Debug)]
pub enum Command<D> {
    Create(D),
    Delete(u64),
    Approve(u64),
    Reject(u64),
}

impl<D> Command<D> {
    pub fn action(&self) -> Action {
        match self {
            Command::Create(_) => Action::Create,
            Command::Delete(_) => Action::Delete,
            Command::Approve(_) => Action::Approve,
            Command::Reject(_) => Action::Reject,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Created(u64),
    Deleted,
    Decided(ApprovalStatus),
    /// Repeated or late decision; the record kept its status.
    AlreadyDecided(ApprovalStatus),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("validation error: {0}")]
    Validation(String),
    /// The id does not resolve, or (for deletes) is not the actor's.
    #[error("record {0} not found")]
    NotFound(u64),
    #[error("{role} may not {action}")]
    NotPermitted { role: Role, action: Action },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Team leads decide, everybody else creates and deletes.
pub fn permits(role: Role, action: Action) -> bool {
    match role {
        Role::TeamLead => matches!(action, Action::Approve | Action::Reject),
        Role::Employee => matches!(action, Action::Create | Action::Delete),
    }
}

pub async fn apply<R: Record>(
    store: &dyn RecordStore<R>,
    actor: &AuthUser,
    command: Command<R::Draft>,
) -> Result<Outcome, WorkflowError> {
    let action = command.action();
    if !permits(actor.role, action) {
        return Err(WorkflowError::NotPermitted {
            role: actor.role,
            action,
        });
    }

    match command {
        Command::Create(draft) => {
            let id = store.insert(actor.user_id, draft).await?;
            Ok(Outcome::Created(id))
        }
        Command::Delete(id) => {
            if store.delete_if_owner(id, actor.user_id).await? {
                Ok(Outcome::Deleted)
            } else {
                Err(WorkflowError::NotFound(id))
            }
        }
        Command::Approve(id) => decide(store, actor, id, ApprovalStatus::Approved).await,
        Command::Reject(id) => decide(store, actor, id, ApprovalStatus::Rejected).await,
    }
}

async fn decide<R: Record>(
    store: &dyn RecordStore<R>,
    actor: &AuthUser,
    id: u64,
    status: ApprovalStatus,
) -> Result<Outcome, WorkflowError> {
    match store.update_status(id, status, actor.user_id).await? {
        Transition::Applied => Ok(Outcome::Decided(status)),
        Transition::AlreadyDecided(current) => Ok(Outcome::AlreadyDecided(current)),
        Transition::Missing => Err(WorkflowError::NotFound(id)),
    }
}

/// Team leads see every pending record; employees see all of their own.
pub async fn visible_records<R: Record>(
    store: &dyn RecordStore<R>,
    actor: &AuthUser,
) -> Result<Vec<R>, StoreError> {
    match actor.role {
        Role::TeamLead => store.list_by_status(ApprovalStatus::Pending).await,
        Role::Employee => store.list_by_owner(actor.user_id).await,
    }
}

/// Logs the result of a form submission. The user is redirected either way.
pub fn log_outcome(kind: &str, actor: &AuthUser, result: &Result<Outcome, WorkflowError>) {
    let user_id = actor.user_id;
    match result {
        Ok(outcome) => tracing::info!(user_id, kind, ?outcome, "Record updated"),
        Err(WorkflowError::Store(e)) => {
            tracing::error!(user_id, kind, error = %e, "Record update failed")
        }
        Err(e) => tracing::warn!(user_id, kind, error = %e, "Record update ignored"),
    }
}
