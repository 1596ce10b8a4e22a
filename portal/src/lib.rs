//! Support portal escalation service.
//!
//! This crate implements the portal's time-based multi-level ticket
//! escalation engine and the surfaces that drive it:
//!
//! - configurable per-priority escalation rules (bulk replace plus
//!   individual add/remove), persisted as JSON
//! - a deterministic sweep over all non-terminal tickets: ascending
//!   threshold matching, circular-escalation guard, optimistic writes
//! - provenance side effects per escalation: an audit entry and a
//!   best-effort update email to the ticket creator
//! - an axum HTTP surface and a CLI, both thin wrappers over the same
//!   `EscalationSweep::run` entry point
//!
//! Authentication, ticket/product/user CRUD, the notification mailbox,
//! and audit querying belong to the wider portal and are consumed here
//! only through narrow interfaces.

pub mod config;
pub mod email;
pub mod escalation;
pub mod model;
pub mod routes;
pub mod seed;
pub mod server;
pub mod store;

// Re-export the engine's core types.
pub use escalation::{
    EscalationDecision, EscalationNotifier, EscalationSweep, SweepError, SweepSummary,
};

// Re-export the domain model.
pub use model::{
    AuditAction, AuditActor, AuditEntry, EscalationMetadata, EscalationRule, RuleCreate,
    StaffRole, Ticket, TicketPriority, TicketStatus, User, UserRole,
};

// Re-export store handles and errors.
pub use store::{
    AuditStore, DirectorySnapshot, RuleStore, StoreError, StoreResult, TicketStore, UserStore,
};

pub use config::PortalConfig;
pub use email::{HttpMailer, MailerError, NoopMailer, TicketMailer};
