//! JSON-file-backed stores for rules, tickets, users, and the audit trail.
//!
//! Each store keeps its working set in memory behind an `RwLock` and
//! persists to one pretty-printed JSON file under the data directory.
//! Writes go through a temp-file-then-rename step so a failed write never
//! leaves a torn file behind.

pub mod audit;
pub mod rules;
pub mod tickets;
pub mod users;

pub use audit::AuditStore;
pub use rules::RuleStore;
pub use tickets::TicketStore;
pub use users::{DirectorySnapshot, UserStore};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock poisoned")]
    LockPoisoned,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflicting update for {0}: record changed since it was read")]
    Conflict(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Load a JSON snapshot from disk. A missing file is an empty store, not
/// an error.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

/// Persist a JSON snapshot atomically: write to `<path>.tmp`, then rename
/// over the target.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let loaded: Option<Vec<String>> = load_json(&temp.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("things.json");
        save_json(&path, &vec!["a".to_string(), "b".to_string()]).unwrap();
        let loaded: Option<Vec<String>> = load_json(&path).unwrap();
        assert_eq!(loaded.unwrap(), vec!["a", "b"]);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
