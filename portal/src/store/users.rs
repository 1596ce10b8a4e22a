//! User directory.
//!
//! The escalation engine treats accounts purely as role lookup targets.
//! One snapshot is taken per sweep and reused for every ticket, so
//! directory changes mid-sweep never affect tickets already evaluated.

use std::path::PathBuf;
use std::sync::RwLock;
use uuid::Uuid;

use super::{load_json, save_json, StoreError, StoreResult};
use crate::model::{StaffRole, User, UserRole};

pub struct UserStore {
    users: RwLock<Vec<User>>,
    path: PathBuf,
}

impl UserStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let users = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            users: RwLock::new(users),
            path,
        })
    }

    pub fn insert(&self, user: User) -> StoreResult<()> {
        let mut users = self.users.write().map_err(|_| StoreError::LockPoisoned)?;
        users.push(user);
        save_json(&self.path, &*users)
    }

    /// A point-in-time copy of the whole directory.
    pub fn snapshot(&self) -> StoreResult<DirectorySnapshot> {
        let users = self.users.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(DirectorySnapshot {
            users: users.clone(),
        })
    }
}

/// Immutable view of the directory taken at the start of a sweep.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    users: Vec<User>,
}

impl DirectorySnapshot {
    pub fn get(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// The role of the given account, if it exists.
    pub fn role_of(&self, id: Uuid) -> Option<UserRole> {
        self.get(id).map(|u| u.role)
    }

    /// Any user holding the given staff role.
    pub fn find_by_role(&self, role: StaffRole) -> Option<&User> {
        let wanted = UserRole::from(role);
        self.users.iter().find(|u| u.role == wanted)
    }

    #[cfg(test)]
    pub fn from_users(users: Vec<User>) -> Self {
        Self { users }
    }
}
