//! Escalation executor: turns an evaluator decision into a persisted
//! state change.
//!
//! This is the only writer of escalation state. Target resolution and the
//! conditional write can each decline without failing the sweep; only a
//! genuine repository failure propagates, and then only for this ticket.

use chrono::{DateTime, Utc};

use super::evaluator::EscalationDecision;
use crate::model::{StaffRole, Ticket, User};
use crate::store::{DirectorySnapshot, StoreError, StoreResult, TicketStore};

/// What happened when a decision was applied to one ticket.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// The ticket was escalated and the updated record persisted.
    Escalated { ticket: Ticket, assignee: User },
    /// Nobody in the directory holds the target role; the ticket is left
    /// untouched.
    NoTargetUser(StaffRole),
    /// Another writer moved the ticket between read and write (e.g. an
    /// overlapping sweep); the ticket is left to that writer.
    Superseded,
}

/// Apply `decision` to `ticket`.
///
/// The write goes through the repository's update-by-business-id
/// operation with an optimistic guard on the `updated_at` value this
/// sweep originally read.
pub fn execute(
    ticket: &Ticket,
    decision: &EscalationDecision,
    directory: &DirectorySnapshot,
    tickets: &TicketStore,
    now: DateTime<Utc>,
) -> StoreResult<ExecutionOutcome> {
    let Some(assignee) = directory.find_by_role(decision.target_role) else {
        return Ok(ExecutionOutcome::NoTargetUser(decision.target_role));
    };

    match tickets.apply_escalation(
        &ticket.id,
        ticket.updated_at,
        assignee.id,
        decision.target_role,
        now,
    ) {
        Ok(updated) => Ok(ExecutionOutcome::Escalated {
            ticket: updated,
            assignee: assignee.clone(),
        }),
        Err(StoreError::Conflict(_)) => Ok(ExecutionOutcome::Superseded),
        Err(err) => Err(err),
    }
}
