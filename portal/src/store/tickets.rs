//! Ticket repository.
//!
//! Stand-in for the portal's ticket database, exposing only the narrow
//! contract the escalation engine needs: list non-terminal tickets and
//! update one ticket by its business id. Escalation writes carry an
//! optimistic guard on `updated_at` so overlapping sweeps cannot both
//! escalate the same ticket.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use uuid::Uuid;

use super::{load_json, save_json, StoreError, StoreResult};
use crate::model::{StaffRole, Ticket, TicketStatus};

pub struct TicketStore {
    tickets: RwLock<HashMap<String, Ticket>>,
    path: PathBuf,
}

impl TicketStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let loaded: Vec<Ticket> = load_json(&path)?.unwrap_or_default();
        let tickets = loaded.into_iter().map(|t| (t.id.clone(), t)).collect();
        Ok(Self {
            tickets: RwLock::new(tickets),
            path,
        })
    }

    fn persist(&self, tickets: &HashMap<String, Ticket>) -> StoreResult<()> {
        let mut all: Vec<&Ticket> = tickets.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        save_json(&self.path, &all)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Ticket>> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tickets.get(id).cloned())
    }

    pub fn insert(&self, ticket: Ticket) -> StoreResult<()> {
        let mut tickets = self.tickets.write().map_err(|_| StoreError::LockPoisoned)?;
        tickets.insert(ticket.id.clone(), ticket);
        self.persist(&tickets)
    }

    /// All tickets still in play: status is neither Resolved nor Closed.
    pub fn find_non_terminal(&self) -> StoreResult<Vec<Ticket>> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut open: Vec<Ticket> = tickets
            .values()
            .filter(|t| !t.status.is_terminal())
            .cloned()
            .collect();
        open.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(open)
    }

    /// Commit an escalation to one ticket, addressed by business id.
    ///
    /// `expected_updated_at` is the value the sweep read before deciding;
    /// if the ticket has moved since, the write is rejected with
    /// `Conflict` and the caller treats the ticket as already handled.
    pub fn apply_escalation(
        &self,
        id: &str,
        expected_updated_at: DateTime<Utc>,
        assignee: Uuid,
        level: StaffRole,
        now: DateTime<Utc>,
    ) -> StoreResult<Ticket> {
        let mut tickets = self.tickets.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = tickets
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("ticket {id}")))?;
        if current.updated_at != expected_updated_at {
            return Err(StoreError::Conflict(format!("ticket {id}")));
        }

        let mut escalated = current.clone();
        escalated.status = TicketStatus::Escalated;
        escalated.assigned_to = Some(assignee);
        escalated.escalation_level = Some(level);
        escalated.updated_at = now;

        let mut next = tickets.clone();
        next.insert(id.to_string(), escalated.clone());
        self.persist(&next)?;
        *tickets = next;
        Ok(escalated)
    }
}
