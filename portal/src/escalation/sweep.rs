//! Escalation sweep coordinator.
//!
//! One sweep is one full pass over the open tickets: load the rule set,
//! the non-terminal tickets, and a directory snapshot once, then evaluate
//! / execute / notify every ticket independently and aggregate a summary.
//! Per-ticket problems degrade that ticket only; the caller always gets a
//! summary back unless the read phase itself fails.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::evaluator;
use super::executor::{self, ExecutionOutcome};
use super::notifier::EscalationNotifier;
use crate::model::{AuditActor, EscalationRule, Ticket};
use crate::store::{DirectorySnapshot, RuleStore, StoreError, TicketStore, UserStore};

/// Result of one sweep, returned to whichever host invoked it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub message: String,
    pub escalated_count: usize,
    pub escalated_tickets: Vec<Ticket>,
}

impl SweepSummary {
    fn no_rules() -> Self {
        Self {
            message: "No escalation rules defined".to_string(),
            escalated_count: 0,
            escalated_tickets: Vec::new(),
        }
    }
}

/// Error for the sweep's read phase. Per-ticket failures never surface
/// here.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates escalation sweeps over the portal stores.
///
/// The runner makes no assumption about how it is invoked; the HTTP
/// handler, the CLI, and the periodic host task all call the same
/// `run` entry point.
pub struct EscalationSweep {
    rules: Arc<RuleStore>,
    tickets: Arc<TicketStore>,
    users: Arc<UserStore>,
    notifier: EscalationNotifier,
}

impl EscalationSweep {
    pub fn new(
        rules: Arc<RuleStore>,
        tickets: Arc<TicketStore>,
        users: Arc<UserStore>,
        notifier: EscalationNotifier,
    ) -> Self {
        Self {
            rules,
            tickets,
            users,
            notifier,
        }
    }

    /// Run one sweep at the current wall-clock time, unattended.
    pub async fn run(&self) -> Result<SweepSummary, SweepError> {
        self.run_at(Utc::now(), AuditActor::system()).await
    }

    /// Run one sweep at an explicit evaluation time on behalf of `actor`.
    pub async fn run_at(
        &self,
        now: DateTime<Utc>,
        actor: AuditActor,
    ) -> Result<SweepSummary, SweepError> {
        // Configuration absence is a distinct zero-result, reported
        // before any ticket is read.
        if self.rules.is_empty()? {
            debug!("escalation sweep skipped: no rules defined");
            return Ok(SweepSummary::no_rules());
        }

        let rules = self.rules.snapshot()?;
        let open = self.tickets.find_non_terminal()?;
        let directory = self.users.snapshot()?;
        let candidates = open.len();

        let tasks = open
            .into_iter()
            .map(|ticket| self.escalate_one(ticket, &rules, &directory, now, &actor));
        let results = join_all(tasks).await;
        let escalated_tickets: Vec<Ticket> = results.into_iter().flatten().collect();

        let escalated_count = escalated_tickets.len();
        info!(candidates, escalated_count, "escalation sweep finished");

        Ok(SweepSummary {
            message: format!("{escalated_count} tickets escalated successfully"),
            escalated_count,
            escalated_tickets,
        })
    }

    /// Evaluate, execute, and notify for a single ticket. Returns the
    /// updated ticket on success and `None` for every flavor of
    /// per-ticket no-op or failure.
    async fn escalate_one(
        &self,
        ticket: Ticket,
        rules: &[EscalationRule],
        directory: &DirectorySnapshot,
        now: DateTime<Utc>,
        actor: &AuditActor,
    ) -> Option<Ticket> {
        let assignee_role = ticket.assigned_to.and_then(|id| directory.role_of(id));
        let decision = evaluator::evaluate(&ticket, assignee_role, rules, now)?;

        match executor::execute(&ticket, &decision, directory, &self.tickets, now) {
            Ok(ExecutionOutcome::Escalated {
                ticket: updated,
                assignee,
            }) => {
                info!(
                    ticket = %updated.id,
                    role = %decision.target_role,
                    assignee = %assignee.name,
                    hours = %format!("{:.1}", decision.hours_since_update),
                    "ticket escalated"
                );
                self.notifier
                    .escalated(actor, &ticket, &updated, &assignee, &decision, directory)
                    .await;
                Some(updated)
            }
            Ok(ExecutionOutcome::NoTargetUser(role)) => {
                debug!(ticket = %ticket.id, %role, "no user holds the escalation target role, skipping");
                None
            }
            Ok(ExecutionOutcome::Superseded) => {
                debug!(ticket = %ticket.id, "ticket changed under the sweep, skipping");
                None
            }
            Err(err) => {
                error!(ticket = %ticket.id, %err, "failed to persist escalation");
                None
            }
        }
    }
}
