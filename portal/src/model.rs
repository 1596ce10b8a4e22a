//! Domain model for the support portal.
//!
//! All enumerations are closed sum types so that an invalid
//! priority/role/status combination cannot be constructed. Wire spellings
//! (serde renames) match the dashboard API: "In Progress", "Support
//! Manager", and so on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket priority levels, in increasing order of urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Ticket lifecycle status.
///
/// Resolved and Closed are terminal: tickets in those states are excluded
/// from escalation sweeps. Escalated is NOT terminal; a ticket can move to
/// a higher tier if a later rule fires with a different target role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Escalated,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Whether this status ends the ticket's escalation lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Escalated => write!(f, "Escalated"),
            Self::Resolved => write!(f, "Resolved"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Staff roles that can be the target of an escalation rule.
///
/// Merchants are deliberately absent: a rule pointing a ticket at a
/// merchant is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    #[serde(rename = "Support Agent")]
    SupportAgent,
    #[serde(rename = "Support Manager")]
    SupportManager,
    #[serde(rename = "Technical Lead")]
    TechnicalLead,
    Admin,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SupportAgent => write!(f, "Support Agent"),
            Self::SupportManager => write!(f, "Support Manager"),
            Self::TechnicalLead => write!(f, "Technical Lead"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// All account roles known to the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "Support Agent")]
    SupportAgent,
    #[serde(rename = "Support Manager")]
    SupportManager,
    #[serde(rename = "Technical Lead")]
    TechnicalLead,
    Admin,
    Merchant,
}

impl From<StaffRole> for UserRole {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::SupportAgent => Self::SupportAgent,
            StaffRole::SupportManager => Self::SupportManager,
            StaffRole::TechnicalLead => Self::TechnicalLead,
            StaffRole::Admin => Self::Admin,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SupportAgent => write!(f, "Support Agent"),
            Self::SupportManager => write!(f, "Support Manager"),
            Self::TechnicalLead => write!(f, "Technical Lead"),
            Self::Admin => write!(f, "Admin"),
            Self::Merchant => write!(f, "Merchant"),
        }
    }
}

/// A portal account. Used by the escalation engine only as a lookup
/// target ("find any user whose role equals X").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// The fields of a ticket the escalation engine reads and writes.
///
/// `updated_at` is the escalation clock: it is refreshed on every
/// escalation so an immediate re-run of the sweep does not re-trigger the
/// same rule. `escalation_level` records the tier last escalated to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Business identifier shown to users (e.g. "TK-1001"). All updates
    /// address tickets by this id, never by storage internals.
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_level: Option<StaffRole>,
}

/// One escalation tier: after `time_in_hours` of inactivity, a ticket of
/// this priority is handed to `escalate_to_role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationRule {
    pub id: Uuid,
    pub priority: TicketPriority,
    pub time_in_hours: f64,
    pub escalate_to_role: StaffRole,
    /// Ordinal used to disambiguate tiers that share a threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied rule fields; the store assigns id and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCreate {
    pub priority: TicketPriority,
    pub time_in_hours: f64,
    pub escalate_to_role: StaffRole,
    #[serde(default)]
    pub escalation_level: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Actions this service writes to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    TicketEscalated,
    EscalationRulesReplaced,
    EscalationRuleAdded,
    EscalationRuleRemoved,
}

/// Who performed an audited action. Unattended sweeps use the system
/// sentinel rather than a real account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditActor {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl AuditActor {
    pub fn system() -> Self {
        Self {
            id: "system".to_string(),
            name: "System".to_string(),
            role: "System".to_string(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            role: user.role.to_string(),
        }
    }
}

/// One audit trail record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub user: AuditActor,
    pub action: AuditAction,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Structured metadata attached to TICKET_ESCALATED audit entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationMetadata {
    pub ticket_id: String,
    pub previous_assignee: Option<String>,
    pub new_assignee: String,
    pub escalation_role: StaffRole,
    /// Elapsed hours at decision time, formatted to one decimal place.
    pub hours_since_update: String,
    pub priority: TicketPriority,
}
