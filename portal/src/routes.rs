//! HTTP routes for the escalation service.
//!
//! Only the escalation surface lives here; generic ticket/product/user
//! CRUD belongs to the wider portal and is out of scope for this
//! service. Authentication/authorization is enforced upstream.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::model::{AuditAction, AuditActor, AuditEntry, EscalationRule, RuleCreate};
use crate::server::AppState;
use crate::store::StoreError;
use crate::SweepSummary;

type AppStateArc = Arc<AppState>;

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

pub fn rule_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/escalation-rules", get(list_rules).post(replace_rules))
        .route("/api/escalation-rules/rule", post(add_rule))
        .route("/api/escalation-rules/:id", delete(remove_rule))
}

pub fn escalation_routes() -> Router<AppStateArc> {
    Router::new().route("/api/check-escalations", get(check_escalations))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn store_error(err: StoreError) -> (StatusCode, String) {
    match err {
        StoreError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

/// Best-effort audit write for rule administration; failures are logged,
/// never surfaced to the caller.
fn audit_rule_change(state: &AppState, action: AuditAction, details: String) {
    let entry = AuditEntry {
        timestamp: chrono::Utc::now(),
        user: AuditActor::system(),
        action,
        details,
        metadata: None,
    };
    if let Err(err) = state.audit.record(entry) {
        warn!(%err, "failed to record rule-change audit entry");
    }
}

async fn list_rules(
    State(state): State<AppStateArc>,
) -> Result<Json<Vec<EscalationRule>>, (StatusCode, String)> {
    state.rules.list().map(Json).map_err(store_error)
}

#[derive(Deserialize)]
struct ReplaceRulesRequest {
    rules: Vec<RuleCreate>,
}

#[derive(Serialize)]
struct ReplaceRulesResponse {
    message: String,
    rules: Vec<EscalationRule>,
}

async fn replace_rules(
    State(state): State<AppStateArc>,
    Json(req): Json<ReplaceRulesRequest>,
) -> Result<Json<ReplaceRulesResponse>, (StatusCode, String)> {
    let rules = state.rules.replace_all(req.rules).map_err(store_error)?;
    audit_rule_change(
        &state,
        AuditAction::EscalationRulesReplaced,
        format!("Escalation rule set replaced ({} rules).", rules.len()),
    );
    Ok(Json(ReplaceRulesResponse {
        message: "Escalation rules saved successfully".to_string(),
        rules,
    }))
}

async fn add_rule(
    State(state): State<AppStateArc>,
    Json(spec): Json<RuleCreate>,
) -> Result<(StatusCode, Json<EscalationRule>), (StatusCode, String)> {
    let rule = state.rules.add(spec).map_err(store_error)?;
    audit_rule_change(
        &state,
        AuditAction::EscalationRuleAdded,
        format!(
            "Escalation rule added: {} after {}h to {}.",
            rule.priority, rule.time_in_hours, rule.escalate_to_role
        ),
    );
    Ok((StatusCode::CREATED, Json(rule)))
}

async fn remove_rule(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = state.rules.remove(id).map_err(store_error)?;
    audit_rule_change(
        &state,
        AuditAction::EscalationRuleRemoved,
        format!(
            "Escalation rule removed: {} after {}h to {}.",
            removed.priority, removed.time_in_hours, removed.escalate_to_role
        ),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Run one escalation sweep and return its summary. Partial failures are
/// folded into the summary; only a read-phase failure becomes an error
/// response.
async fn check_escalations(
    State(state): State<AppStateArc>,
) -> Result<Json<SweepSummary>, (StatusCode, String)> {
    state
        .sweep
        .run()
        .await
        .map(Json)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}
