//! Escalation evaluator: the pure decision function.
//!
//! Given one ticket, the current assignee's role, the rule set, and a
//! caller-supplied clock, decide whether escalation is due and to which
//! role. No I/O and no hidden time source, so threshold-boundary behavior
//! is fully deterministic under test.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::model::{EscalationRule, StaffRole, Ticket, UserRole};

/// The outcome of evaluating one ticket: which rule fired and where the
/// ticket should go.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationDecision {
    /// Rule that won the ascending scan.
    pub rule_id: Uuid,
    /// Role the ticket should be handed to.
    pub target_role: StaffRole,
    /// Hours elapsed since the ticket's last meaningful change.
    pub hours_since_update: f64,
}

/// The rules applicable to one priority, sorted ascending by threshold.
///
/// Sorting is done here regardless of storage order; ties are broken by
/// escalation level and then rule id so equal thresholds scan in a stable
/// order.
pub fn rules_for_priority<'a>(
    rules: &'a [EscalationRule],
    ticket: &Ticket,
) -> Vec<&'a EscalationRule> {
    let mut applicable: Vec<&EscalationRule> = rules
        .iter()
        .filter(|r| r.priority == ticket.priority)
        .collect();
    applicable.sort_by(|a, b| {
        a.time_in_hours
            .partial_cmp(&b.time_in_hours)
            .unwrap_or(Ordering::Equal)
            .then(a.escalation_level.cmp(&b.escalation_level))
            .then(a.id.cmp(&b.id))
    });
    applicable
}

/// Decide whether `ticket` is due for escalation at `now`.
///
/// Scan order matters: rules are walked in ascending threshold order, and
/// each satisfied rule overwrites the previous candidate, so the highest
/// qualifying tier wins. A satisfied rule whose target equals the current
/// assignee's role is skipped without ending the scan (no re-assignment
/// to the same tier), while the first unmet threshold ends it (later
/// thresholds are higher and cannot be met either).
pub fn evaluate(
    ticket: &Ticket,
    assignee_role: Option<UserRole>,
    rules: &[EscalationRule],
    now: DateTime<Utc>,
) -> Option<EscalationDecision> {
    if ticket.status.is_terminal() {
        return None;
    }

    let applicable = rules_for_priority(rules, ticket);
    if applicable.is_empty() {
        return None;
    }

    let hours_since_update = (now - ticket.updated_at).num_milliseconds() as f64 / 3_600_000.0;

    let mut winner: Option<&EscalationRule> = None;
    for rule in applicable {
        if hours_since_update > rule.time_in_hours {
            // An unassigned ticket is always eligible: a None role never
            // equals a rule target.
            if assignee_role != Some(UserRole::from(rule.escalate_to_role)) {
                winner = Some(rule);
            }
        } else {
            break;
        }
    }

    winner.map(|rule| EscalationDecision {
        rule_id: rule.id,
        target_role: rule.escalate_to_role,
        hours_since_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TicketPriority, TicketStatus};
    use chrono::Duration;

    fn rule(priority: TicketPriority, hours: f64, role: StaffRole) -> EscalationRule {
        EscalationRule {
            id: Uuid::new_v4(),
            priority,
            time_in_hours: hours,
            escalate_to_role: role,
            escalation_level: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn ticket_updated_hours_ago(priority: TicketPriority, hours: i64, now: DateTime<Utc>) -> Ticket {
        Ticket {
            id: "TK-1001".to_string(),
            title: "Checkout broken".to_string(),
            description: "Payment page 500s".to_string(),
            status: TicketStatus::InProgress,
            priority,
            created_by: Uuid::new_v4(),
            assigned_to: None,
            created_at: now - Duration::hours(hours + 1),
            updated_at: now - Duration::hours(hours),
            escalation_level: None,
        }
    }

    #[test]
    fn test_threshold_is_strictly_greater_than() {
        let now = Utc::now();
        let rules = vec![rule(
            TicketPriority::High,
            24.0,
            StaffRole::SupportManager,
        )];

        // Exactly at the threshold: not due.
        let at = ticket_updated_hours_ago(TicketPriority::High, 24, now);
        assert!(evaluate(&at, None, &rules, now).is_none());

        // One minute past: due.
        let past = {
            let mut t = at.clone();
            t.updated_at = now - Duration::hours(24) - Duration::minutes(1);
            t
        };
        let decision = evaluate(&past, None, &rules, now).unwrap();
        assert_eq!(decision.target_role, StaffRole::SupportManager);
        assert!(decision.hours_since_update > 24.0);
    }

    #[test]
    fn test_terminal_tickets_are_never_due() {
        let now = Utc::now();
        let rules = vec![rule(TicketPriority::High, 1.0, StaffRole::Admin)];
        for status in [TicketStatus::Resolved, TicketStatus::Closed] {
            let mut ticket = ticket_updated_hours_ago(TicketPriority::High, 500, now);
            ticket.status = status;
            assert!(evaluate(&ticket, None, &rules, now).is_none());
        }
    }

    #[test]
    fn test_no_rules_for_priority_is_no_decision() {
        let now = Utc::now();
        let rules = vec![rule(TicketPriority::Critical, 1.0, StaffRole::Admin)];
        let ticket = ticket_updated_hours_ago(TicketPriority::Low, 500, now);
        assert!(evaluate(&ticket, None, &rules, now).is_none());
    }

    #[test]
    fn test_highest_qualifying_tier_wins() {
        let now = Utc::now();
        let rules = vec![
            rule(TicketPriority::High, 72.0, StaffRole::Admin),
            rule(TicketPriority::High, 24.0, StaffRole::SupportManager),
        ];
        let ticket = ticket_updated_hours_ago(TicketPriority::High, 80, now);

        let decision = evaluate(&ticket, None, &rules, now).unwrap();
        assert_eq!(decision.target_role, StaffRole::Admin);
    }

    #[test]
    fn test_anti_circularity_skips_current_tier() {
        let now = Utc::now();
        let rules = vec![rule(
            TicketPriority::High,
            24.0,
            StaffRole::SupportManager,
        )];
        let mut ticket = ticket_updated_hours_ago(TicketPriority::High, 48, now);
        ticket.assigned_to = Some(Uuid::new_v4());

        // The only matching rule targets the assignee's own role.
        assert!(evaluate(&ticket, Some(UserRole::SupportManager), &rules, now).is_none());
    }

    #[test]
    fn test_same_tier_skip_does_not_end_the_scan() {
        let now = Utc::now();
        let rules = vec![
            rule(TicketPriority::High, 24.0, StaffRole::SupportManager),
            rule(TicketPriority::High, 72.0, StaffRole::Admin),
        ];
        let mut ticket = ticket_updated_hours_ago(TicketPriority::High, 80, now);
        ticket.assigned_to = Some(Uuid::new_v4());
        ticket.status = TicketStatus::Escalated;

        // Already with the manager; the 72h Admin tier is still reached.
        let decision = evaluate(&ticket, Some(UserRole::SupportManager), &rules, now).unwrap();
        assert_eq!(decision.target_role, StaffRole::Admin);
    }

    #[test]
    fn test_unmet_threshold_ends_the_scan() {
        let now = Utc::now();
        let rules = vec![
            rule(TicketPriority::High, 24.0, StaffRole::SupportManager),
            rule(TicketPriority::High, 72.0, StaffRole::Admin),
        ];
        let ticket = ticket_updated_hours_ago(TicketPriority::High, 30, now);

        let decision = evaluate(&ticket, None, &rules, now).unwrap();
        assert_eq!(decision.target_role, StaffRole::SupportManager);
    }

    #[test]
    fn test_equal_thresholds_scan_in_level_order() {
        let now = Utc::now();
        let mut first = rule(TicketPriority::Critical, 4.0, StaffRole::TechnicalLead);
        first.escalation_level = Some(1);
        let mut second = rule(TicketPriority::Critical, 4.0, StaffRole::Admin);
        second.escalation_level = Some(2);

        let ticket = ticket_updated_hours_ago(TicketPriority::Critical, 6, now);
        let decision = evaluate(&ticket, None, &[first, second], now).unwrap();
        // Both are satisfied; the later (higher level) tier wins.
        assert_eq!(decision.target_role, StaffRole::Admin);
    }

    #[test]
    fn test_merchant_assignee_never_matches_a_rule_target() {
        let now = Utc::now();
        let rules = vec![rule(TicketPriority::High, 24.0, StaffRole::SupportManager)];
        let mut ticket = ticket_updated_hours_ago(TicketPriority::High, 48, now);
        ticket.assigned_to = Some(Uuid::new_v4());

        let decision = evaluate(&ticket, Some(UserRole::Merchant), &rules, now).unwrap();
        assert_eq!(decision.target_role, StaffRole::SupportManager);
    }
}
