//! Demo data for local bring-up.
//!
//! Populates the stores with a small staff roster, a few open tickets of
//! varying staleness, and a two-tier rule set for High priority, so a
//! first `check-escalations` call has something to do.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::model::{
    RuleCreate, StaffRole, Ticket, TicketPriority, TicketStatus, User, UserRole,
};
use crate::server::AppState;
use crate::store::StoreResult;

fn user(name: &str, email: &str, role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        role,
    }
}

fn ticket(
    id: &str,
    title: &str,
    priority: TicketPriority,
    status: TicketStatus,
    stale_hours: i64,
    creator: &User,
) -> Ticket {
    let now = Utc::now();
    Ticket {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} (reported by {})", creator.name),
        status,
        priority,
        created_by: creator.id,
        assigned_to: None,
        created_at: now - Duration::hours(stale_hours + 2),
        updated_at: now - Duration::hours(stale_hours),
        escalation_level: None,
    }
}

/// Seed the stores. Existing data is left in place; seeding twice just
/// adds more demo records, so it is meant for a fresh data directory.
pub fn run(state: &AppState) -> StoreResult<usize> {
    let admin = user("Olu Adeyemi", "olu@example.com", UserRole::Admin);
    let manager = user("Sam Kovacs", "sam@example.com", UserRole::SupportManager);
    let agent = user("Priya Nair", "priya@example.com", UserRole::SupportAgent);
    let lead = user("Ada Lindqvist", "ada@example.com", UserRole::TechnicalLead);
    let merchant = user("Mira Chen", "mira@example.com", UserRole::Merchant);

    for u in [&admin, &manager, &agent, &lead, &merchant] {
        state.users.insert(u.clone())?;
    }

    let tickets = [
        ticket(
            "TK-1001",
            "Checkout page returns 500",
            TicketPriority::High,
            TicketStatus::New,
            30,
            &merchant,
        ),
        ticket(
            "TK-1002",
            "Settlement report delayed",
            TicketPriority::Medium,
            TicketStatus::InProgress,
            10,
            &merchant,
        ),
        ticket(
            "TK-1003",
            "API keys cannot be rotated",
            TicketPriority::High,
            TicketStatus::InProgress,
            80,
            &merchant,
        ),
        ticket(
            "TK-1004",
            "Dashboard logo blurry",
            TicketPriority::Low,
            TicketStatus::Resolved,
            200,
            &merchant,
        ),
    ];
    for t in &tickets {
        state.tickets.insert(t.clone())?;
    }

    state.rules.replace_all(vec![
        RuleCreate {
            priority: TicketPriority::High,
            time_in_hours: 24.0,
            escalate_to_role: StaffRole::SupportManager,
            escalation_level: Some(1),
            description: Some("First escalation for stale High tickets".to_string()),
        },
        RuleCreate {
            priority: TicketPriority::High,
            time_in_hours: 72.0,
            escalate_to_role: StaffRole::Admin,
            escalation_level: Some(2),
            description: Some("Second escalation for very stale High tickets".to_string()),
        },
        RuleCreate {
            priority: TicketPriority::Critical,
            time_in_hours: 4.0,
            escalate_to_role: StaffRole::TechnicalLead,
            escalation_level: Some(1),
            description: None,
        },
    ])?;

    Ok(tickets.len())
}
