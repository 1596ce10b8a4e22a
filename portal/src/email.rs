//! Outbound email seam.
//!
//! Delivery itself belongs to an external mail gateway; this module only
//! formats the ticket-update message and hands it over as a JSON POST.
//! Callers are expected to catch errors, escalations are never reverted
//! because a message could not be sent.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::model::{Ticket, User};

/// Error type for mail dispatch.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail gateway rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Sends ticket lifecycle notifications.
#[async_trait]
pub trait TicketMailer: Send + Sync {
    /// Notify the ticket creator that their ticket changed.
    async fn notify_ticket_update(
        &self,
        ticket: &Ticket,
        creator: &User,
        assignee: Option<&User>,
    ) -> Result<(), MailerError>;
}

#[derive(Serialize)]
struct OutboundMessage {
    from: String,
    to: String,
    subject: String,
    text: String,
}

/// Mailer backed by an HTTP mail gateway.
pub struct HttpMailer {
    http: reqwest::Client,
    gateway_url: String,
    from: String,
}

impl HttpMailer {
    pub fn new(gateway_url: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway_url: gateway_url.into(),
            from: from.into(),
        }
    }

    fn update_body(ticket: &Ticket, creator: &User, assignee: Option<&User>) -> String {
        let assigned_line = match assignee {
            Some(a) => format!("{} ({})", a.name, a.email),
            None => "Unassigned".to_string(),
        };
        format!(
            "Hello {},\n\n\
             Your support ticket has been updated:\n\n\
             Ticket ID: {}\n\
             Title: {}\n\
             Status: {}\n\
             Priority: {}\n\
             Assigned To: {}\n\n\
             You can view the complete details and history of your ticket in the support portal.",
            creator.name, ticket.id, ticket.title, ticket.status, ticket.priority, assigned_line
        )
    }
}

#[async_trait]
impl TicketMailer for HttpMailer {
    async fn notify_ticket_update(
        &self,
        ticket: &Ticket,
        creator: &User,
        assignee: Option<&User>,
    ) -> Result<(), MailerError> {
        let message = OutboundMessage {
            from: self.from.clone(),
            to: creator.email.clone(),
            subject: format!("Update on Ticket #{}: {}", ticket.id, ticket.title),
            text: Self::update_body(ticket, creator, assignee),
        };

        let response = self
            .http
            .post(&self.gateway_url)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected { status, body });
        }

        debug!(ticket = %ticket.id, to = %message.to, "ticket update email dispatched");
        Ok(())
    }
}

/// Mailer used when no gateway is configured; logs and succeeds.
pub struct NoopMailer;

#[async_trait]
impl TicketMailer for NoopMailer {
    async fn notify_ticket_update(
        &self,
        ticket: &Ticket,
        creator: &User,
        _assignee: Option<&User>,
    ) -> Result<(), MailerError> {
        debug!(ticket = %ticket.id, to = %creator.email, "no mail gateway configured, dropping update email");
        Ok(())
    }
}
