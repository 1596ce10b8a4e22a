//! HTTP server wiring.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::PortalConfig;
use crate::email::{HttpMailer, NoopMailer, TicketMailer};
use crate::escalation::{EscalationNotifier, EscalationSweep};
use crate::routes;
use crate::store::{AuditStore, RuleStore, StoreResult, TicketStore, UserStore};

/// Application state shared across handlers.
pub struct AppState {
    pub rules: Arc<RuleStore>,
    pub tickets: Arc<TicketStore>,
    pub users: Arc<UserStore>,
    pub audit: Arc<AuditStore>,
    pub sweep: EscalationSweep,
}

impl AppState {
    /// Open all stores under the configured data directory and wire the
    /// sweep runner.
    pub fn open(config: &PortalConfig) -> StoreResult<Self> {
        let rules = Arc::new(RuleStore::open(config.store_path("rules.json"))?);
        let tickets = Arc::new(TicketStore::open(config.store_path("tickets.json"))?);
        let users = Arc::new(UserStore::open(config.store_path("users.json"))?);
        let audit = Arc::new(AuditStore::open(config.store_path("audit.json"))?);

        let mailer: Arc<dyn TicketMailer> = match &config.mail {
            Some(mail) => Arc::new(HttpMailer::new(&mail.gateway_url, &mail.from)),
            None => Arc::new(NoopMailer),
        };

        let notifier = EscalationNotifier::new(audit.clone(), mailer);
        let sweep = EscalationSweep::new(rules.clone(), tickets.clone(), users.clone(), notifier);

        Ok(Self {
            rules,
            tickets,
            users,
            audit,
            sweep,
        })
    }
}

/// Build the portal router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::rule_routes())
        .merge(routes::escalation_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server, and the periodic sweep task when an interval is
/// configured. The engine itself stays invocation-agnostic; this is the
/// host wrapper.
pub async fn run(config: PortalConfig) -> Result<()> {
    let state = Arc::new(AppState::open(&config)?);

    if let Some(secs) = config.sweep_interval_secs {
        let periodic = state.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            // The first tick fires immediately; skip it so startup does
            // not race store seeding.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match periodic.sweep.run().await {
                    Ok(summary) => {
                        info!(escalated = summary.escalated_count, "periodic sweep finished")
                    }
                    Err(err) => error!(%err, "periodic sweep failed"),
                }
            }
        });
        info!(interval_secs = secs, "periodic escalation sweep enabled");
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
