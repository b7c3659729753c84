//! Email delivery for invitations.
//!
//! Only the `console` provider is built in: messages are written to the log
//! instead of being sent. A disabled service accepts and drops every message.

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

/// Email service for transactional messages.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.is_enabled() {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                info!(
                    to = %message.to,
                    from = %self.config.sender_email,
                    subject = %message.subject,
                    body = %message.body_text,
                    "Email (console provider)"
                );
                Ok(())
            }
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send an invitation with its acceptance link.
    pub async fn send_invitation_email(
        &self,
        to_email: &str,
        accept_url: &str,
        personal_message: Option<&str>,
        expires_in_days: i64,
    ) -> Result<(), EmailError> {
        let note = personal_message
            .map(|m| format!("\n\nA note from the person who invited you:\n\n{}\n", m))
            .unwrap_or_default();

        let body_text = format!(
            r#"Hi,

You have been invited to join the {sender} TA directory.{note}

Accept the invitation here:

{url}

This link will expire in {days} days.

Best regards,
The {sender} Team"#,
            sender = self.config.sender_name,
            note = note,
            url = accept_url,
            days = expires_in_days
        );

        self.send(EmailMessage {
            to: to_email.to_string(),
            subject: format!("You're invited to the {}", self.config.sender_name),
            body_text,
        })
        .await
    }
}
