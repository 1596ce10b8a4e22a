//! Time-based multi-level ticket escalation engine.
//!
//! Deterministic pipeline, no hidden state:
//!
//! ```text
//! RuleStore ──snapshot──┐
//! TicketStore ──reads──▶│ evaluator: match rules by priority,
//! UserStore ──snapshot──┘            ascending-threshold scan
//!        │
//!        ▼
//! executor: resolve target user, conditional write by business id
//!        │
//!        ▼
//! notifier: audit entry + creator email (best effort, never reverts)
//!        │
//!        ▼
//! sweep:  per-ticket isolation, aggregated SweepSummary
//! ```
//!
//! Evaluation is a pure function over an injected clock; the sweep is an
//! explicit entry point invokable from the HTTP handler, the CLI, or a
//! periodic host task.

pub mod evaluator;
pub mod executor;
pub mod notifier;
pub mod sweep;

pub use evaluator::{evaluate, EscalationDecision};
pub use executor::{execute, ExecutionOutcome};
pub use notifier::EscalationNotifier;
pub use sweep::{EscalationSweep, SweepError, SweepSummary};
