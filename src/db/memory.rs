//! In-process stores backed by `RwLock`ed vectors. Rows keep insertion order,
//! which doubles as id order.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::store::{RecordStore, StoreError, Transition, UserStore};
use crate::model::{ApprovalStatus, AttendanceRecord, LeaveRequest, Record, Role, User};

#[derive(Default)]
pub struct MemoryUsers {
    users: RwLock<Vec<User>>,
}

impl MemoryUsers {
    /// Provision a user and return its id.
    pub fn add(&self, username: &str, password_hash: &str, role: Role) -> u64 {
        let mut users = self.users.write().expect("user table poisoned");
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
        });
        id
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().expect("user table poisoned");
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let users = self.users.read().expect("user table poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

struct Table<R> {
    next_id: u64,
    rows: Vec<R>,
}

pub struct MemoryTable<R> {
    inner: RwLock<Table<R>>,
}

impl<R> Default for MemoryTable<R> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Table {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }
}

impl<R: Record> MemoryTable<R> {
    pub fn len(&self) -> usize {
        self.inner.read().expect("record table poisoned").rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: u64) -> Option<R> {
        let table = self.inner.read().expect("record table poisoned");
        table.rows.iter().find(|r| r.id() == id).cloned()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryTable<R> {
    async fn insert(&self, owner: u64, draft: R::Draft) -> Result<u64, StoreError> {
        let mut table = self.inner.write().expect("record table poisoned");
        let id = table.next_id;
        table.next_id += 1;
        table.rows.push(R::from_draft(id, owner, draft));
        Ok(id)
    }

    async fn delete_if_owner(&self, id: u64, owner: u64) -> Result<bool, StoreError> {
        let mut table = self.inner.write().expect("record table poisoned");
        let position = table.rows.iter().position(|r| {
            r.id() == id
                && r.owner() == owner
                && (R::DELETABLE_ONCE_DECIDED || !r.approval().is_decided())
        });
        match position {
            Some(index) => {
                table.rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_status(
        &self,
        id: u64,
        status: ApprovalStatus,
        approver: u64,
    ) -> Result<Transition, StoreError> {
        let mut table = self.inner.write().expect("record table poisoned");
        let Some(row) = table.rows.iter_mut().find(|r| r.id() == id) else {
            return Ok(Transition::Missing);
        };
        let current = row.approval();
        if current.is_decided() {
            return Ok(Transition::AlreadyDecided(current));
        }
        row.record_decision(status, approver);
        Ok(Transition::Applied)
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<R>, StoreError> {
        let table = self.inner.read().expect("record table poisoned");
        Ok(table.rows.iter().filter(|r| r.owner() == owner).cloned().collect())
    }

    async fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<R>, StoreError> {
        let table = self.inner.read().expect("record table poisoned");
        Ok(table
            .rows
            .iter()
            .filter(|r| r.approval() == status)
            .cloned()
            .collect())
    }
}

/// Every table the app needs, held in memory.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Arc<MemoryUsers>,
    pub attendance: Arc<MemoryTable<AttendanceRecord>>,
    pub leave: Arc<MemoryTable<LeaveRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
