//! Audit trail sink.
//!
//! The portal's full audit facility (querying, CSV export) lives
//! elsewhere; this service only appends. Entries are kept newest-last and
//! persisted alongside the other stores.

use std::path::PathBuf;
use std::sync::RwLock;

use super::{load_json, save_json, StoreError, StoreResult};
use crate::model::AuditEntry;

pub struct AuditStore {
    entries: RwLock<Vec<AuditEntry>>,
    path: PathBuf,
}

impl AuditStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            entries: RwLock::new(entries),
            path,
        })
    }

    /// Append one entry and persist.
    pub fn record(&self, entry: AuditEntry) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.push(entry);
        save_json(&self.path, &*entries)
    }

    /// The most recent `n` entries, newest first.
    pub fn recent(&self, n: usize) -> StoreResult<Vec<AuditEntry>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.iter().rev().take(n).cloned().collect())
    }
}
