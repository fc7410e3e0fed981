// src/services/mailer.rs

//! Email delivery of run reports.
//!
//! Delivery never fails the run: every problem, including an unparsable
//! address, comes back as [`Delivery::Failed`] and is logged here.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{EmailConfig, Report, Secrets};

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed(String),
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent)
    }
}

/// Delivers a report over some external channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, report: &Report) -> Delivery;
}

/// SMTP submission with STARTTLS and sender credentials.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

impl SmtpNotifier {
    pub fn new(config: &EmailConfig, secrets: &Secrets) -> Result<Self> {
        let credentials = Credentials::new(
            secrets.sender_email.clone(),
            secrets.sender_password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::config(format!("invalid SMTP relay '{}': {e}", config.smtp_host)))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            sender: secrets.sender_email.clone(),
            recipient: secrets.recipient_email.clone(),
        })
    }

    async fn deliver(&self, report: &Report) -> Result<()> {
        let message = build_message(&self.sender, &self.recipient, report)?;
        self.transport
            .send(message)
            .await
            .map_err(AppError::notification)?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, report: &Report) -> Delivery {
        match self.deliver(report).await {
            Ok(()) => {
                log::info!("Email sent: {}", report.subject);
                Delivery::Sent
            }
            Err(e) => {
                log::error!("Failed to send email: {}", e);
                Delivery::Failed(e.to_string())
            }
        }
    }
}

/// Plain-text message from `sender` to a single `recipient`.
fn build_message(sender: &str, recipient: &str, report: &Report) -> Result<Message> {
    let from: Mailbox = sender
        .parse()
        .map_err(|e| AppError::notification(format!("invalid sender '{sender}': {e}")))?;
    let to: Mailbox = recipient
        .parse()
        .map_err(|e| AppError::notification(format!("invalid recipient '{recipient}': {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(report.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(report.body.clone())
        .map_err(AppError::notification)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report {
            subject: "PDF Monitor: Changes Detected".to_string(),
            body: "Changes have been detected in the monitored PDF!".to_string(),
        }
    }

    #[test]
    fn builds_plain_text_message() {
        let message = build_message("bot@example.com", "me@example.com", &report()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: bot@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: PDF Monitor: Changes Detected"));
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[test]
    fn invalid_recipient_is_notification_error() {
        let err = build_message("bot@example.com", "not an address", &report()).unwrap_err();
        assert!(matches!(err, AppError::Notification(ref m) if m.contains("recipient")));
    }

    #[tokio::test]
    async fn unreachable_relay_is_swallowed() {
        let config = EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1,
        };
        let secrets = Secrets {
            pdf_url: "https://example.com/a.pdf".to_string(),
            api_key: "key".to_string(),
            sender_email: "bot@example.com".to_string(),
            sender_password: "pw".to_string(),
            recipient_email: "me@example.com".to_string(),
        };
        let notifier = SmtpNotifier::new(&config, &secrets).unwrap();

        let delivery = notifier.send(&report()).await;
        assert!(matches!(delivery, Delivery::Failed(_)));
    }
}
