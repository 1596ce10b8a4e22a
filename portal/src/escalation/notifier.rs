//! Side effects for a committed escalation: one audit entry plus an
//! update email to the ticket creator.
//!
//! Both are best-effort. The ticket mutation has already been persisted
//! by the time this runs; nothing here may fail the sweep or roll the
//! escalation back.

use std::sync::Arc;
use tracing::{debug, error, warn};

use super::evaluator::EscalationDecision;
use crate::email::TicketMailer;
use crate::model::{
    AuditAction, AuditActor, AuditEntry, EscalationMetadata, Ticket, User,
};
use crate::store::{AuditStore, DirectorySnapshot};

pub struct EscalationNotifier {
    audit: Arc<AuditStore>,
    mailer: Arc<dyn TicketMailer>,
}

impl EscalationNotifier {
    pub fn new(audit: Arc<AuditStore>, mailer: Arc<dyn TicketMailer>) -> Self {
        Self { audit, mailer }
    }

    /// Record provenance for one escalated ticket and try to notify its
    /// creator. `before` is the ticket as the sweep read it, `after` the
    /// persisted result.
    pub async fn escalated(
        &self,
        actor: &AuditActor,
        before: &Ticket,
        after: &Ticket,
        assignee: &User,
        decision: &EscalationDecision,
        directory: &DirectorySnapshot,
    ) {
        let previous_assignee = before
            .assigned_to
            .and_then(|id| directory.get(id))
            .map(|u| u.name.clone());

        let metadata = EscalationMetadata {
            ticket_id: after.id.clone(),
            previous_assignee,
            new_assignee: assignee.name.clone(),
            escalation_role: decision.target_role,
            hours_since_update: format!("{:.1}", decision.hours_since_update),
            priority: after.priority,
        };

        let entry = AuditEntry {
            timestamp: chrono::Utc::now(),
            user: actor.clone(),
            action: AuditAction::TicketEscalated,
            details: format!(
                "Ticket {} escalated to {} ({}) after {:.1} hours.",
                after.id, assignee.name, assignee.role, decision.hours_since_update
            ),
            metadata: serde_json::to_value(&metadata).ok(),
        };

        if let Err(err) = self.audit.record(entry) {
            error!(ticket = %after.id, %err, "failed to record escalation audit entry");
        }

        let Some(creator) = directory.get(after.created_by) else {
            debug!(ticket = %after.id, "creator not in directory, skipping update email");
            return;
        };

        if let Err(err) = self
            .mailer
            .notify_ticket_update(after, creator, Some(assignee))
            .await
        {
            warn!(ticket = %after.id, %err, "failed to send escalation email");
        }
    }
}
