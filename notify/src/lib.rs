//! Guardian notifications.
//!
//! When the classifier reports a critical pattern, the service notifies the
//! user's configured guardian through a [`NotificationGateway`]. The
//! production gateway is [`MailClient`], a thin JSON client for an
//! SMTP-provider HTTP API; message bodies are rendered by [`template`].
//! Delivery failures are reported to the caller and never affect the
//! verdict already shown in the app.

use async_trait::async_trait;
use thiserror::Error;

pub mod mail;
pub mod template;

pub use mail::MailClient;

/// Payload for a guardian alert.
#[derive(Clone, Debug)]
pub struct Alert {
    /// Guardian email address.
    pub to: String,
    pub guardian_name: String,
    /// The user the alert is about.
    pub student_name: String,
    /// Human-readable summary of the detected pattern.
    pub details: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("network error: {0}")]
    Network(String),
    #[error("mail provider rejected the message with status {0}")]
    Rejected(u16),
    #[error("missing configuration: {0}")]
    Config(&'static str),
}

/// Capability to deliver a guardian alert.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Gateway that only logs, used when no mail provider is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopGateway;

#[async_trait]
impl NotificationGateway for NoopGateway {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        log::warn!(
            "mail delivery disabled, dropping guardian alert for {} to {}",
            alert.student_name,
            alert.to
        );
        Ok(())
    }
}
