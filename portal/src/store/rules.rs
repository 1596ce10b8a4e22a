//! Escalation rule store.
//!
//! Rules are administered as a whole set from the dashboard: the bulk
//! replace operation is all-or-nothing, so a failed write leaves the
//! previous set intact in memory and on disk.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::RwLock;
use uuid::Uuid;

use super::{load_json, save_json, StoreError, StoreResult};
use crate::model::{EscalationRule, RuleCreate};

pub struct RuleStore {
    rules: RwLock<Vec<EscalationRule>>,
    path: PathBuf,
}

impl RuleStore {
    /// Open the store, loading any persisted rule set.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let rules = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            rules: RwLock::new(rules),
            path,
        })
    }

    fn materialize(spec: RuleCreate) -> EscalationRule {
        EscalationRule {
            id: Uuid::new_v4(),
            priority: spec.priority,
            time_in_hours: spec.time_in_hours,
            escalate_to_role: spec.escalate_to_role,
            escalation_level: spec.escalation_level,
            description: spec.description,
            created_at: Utc::now(),
        }
    }

    /// All rules, newest first (presentation order for the dashboard).
    pub fn list(&self) -> StoreResult<Vec<EscalationRule>> {
        let rules = self.rules.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut out = rules.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    /// A point-in-time copy of the full rule set, in storage order. The
    /// sweep takes one snapshot and reuses it for every ticket.
    pub fn snapshot(&self) -> StoreResult<Vec<EscalationRule>> {
        let rules = self.rules.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rules.clone())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        let rules = self.rules.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rules.is_empty())
    }

    /// Discard the current rule set and persist `specs` in its place.
    ///
    /// The new set is written to disk before the in-memory swap, so on
    /// any failure the prior rules remain in effect.
    pub fn replace_all(&self, specs: Vec<RuleCreate>) -> StoreResult<Vec<EscalationRule>> {
        let next: Vec<EscalationRule> = specs.into_iter().map(Self::materialize).collect();
        let mut rules = self.rules.write().map_err(|_| StoreError::LockPoisoned)?;
        save_json(&self.path, &next)?;
        *rules = next.clone();
        Ok(next)
    }

    /// Add a single rule to the set.
    pub fn add(&self, spec: RuleCreate) -> StoreResult<EscalationRule> {
        let rule = Self::materialize(spec);
        let mut rules = self.rules.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = rules.clone();
        next.push(rule.clone());
        save_json(&self.path, &next)?;
        *rules = next;
        Ok(rule)
    }

    /// Remove a single rule by id.
    pub fn remove(&self, id: Uuid) -> StoreResult<EscalationRule> {
        let mut rules = self.rules.write().map_err(|_| StoreError::LockPoisoned)?;
        let position = rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("escalation rule {id}")))?;
        let mut next = rules.clone();
        let removed = next.remove(position);
        save_json(&self.path, &next)?;
        *rules = next;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StaffRole, TicketPriority};

    fn spec(priority: TicketPriority, hours: f64, role: StaffRole) -> RuleCreate {
        RuleCreate {
            priority,
            time_in_hours: hours,
            escalate_to_role: role,
            escalation_level: None,
            description: None,
        }
    }

    #[test]
    fn test_open_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = RuleStore::open(temp.path().join("rules.json")).unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_replace_all_discards_previous_set() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = RuleStore::open(temp.path().join("rules.json")).unwrap();

        store
            .replace_all(vec![spec(TicketPriority::Low, 48.0, StaffRole::SupportAgent)])
            .unwrap();
        let saved = store
            .replace_all(vec![
                spec(TicketPriority::High, 24.0, StaffRole::SupportManager),
                spec(TicketPriority::High, 72.0, StaffRole::Admin),
            ])
            .unwrap();

        assert_eq!(saved.len(), 2);
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.priority == TicketPriority::High));
    }

    #[test]
    fn test_rules_survive_reopen() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("rules.json");
        {
            let store = RuleStore::open(&path).unwrap();
            store
                .replace_all(vec![spec(TicketPriority::Critical, 4.0, StaffRole::Admin)])
                .unwrap();
        }
        let reopened = RuleStore::open(&path).unwrap();
        let rules = reopened.snapshot().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].escalate_to_role, StaffRole::Admin);
        assert_eq!(rules[0].time_in_hours, 4.0);
    }

    #[test]
    fn test_add_and_remove() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = RuleStore::open(temp.path().join("rules.json")).unwrap();

        let rule = store
            .add(spec(TicketPriority::Medium, 36.0, StaffRole::TechnicalLead))
            .unwrap();
        assert!(!store.is_empty().unwrap());

        store.remove(rule.id).unwrap();
        assert!(store.is_empty().unwrap());

        let missing = store.remove(rule.id);
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }
}
