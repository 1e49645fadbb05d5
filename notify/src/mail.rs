//! HTTP client for an SMTP-provider mail API.
//!
//! [`MailClient`] implements [`NotificationGateway`] by POSTing a
//! SendGrid-style JSON payload to the configured endpoint. Configuration
//! comes from the environment: `MAIL_API_URL`, `MAIL_API_KEY` and
//! `MAIL_FROM`.

use async_trait::async_trait;
use serde_json::json;

use crate::{template, Alert, NotificationGateway, NotifyError};

pub struct MailClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl MailClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    /// Build a client from `MAIL_API_URL`, `MAIL_API_KEY` and `MAIL_FROM`.
    pub fn from_env() -> Result<Self, NotifyError> {
        let api_url =
            std::env::var("MAIL_API_URL").map_err(|_| NotifyError::Config("MAIL_API_URL"))?;
        let api_key =
            std::env::var("MAIL_API_KEY").map_err(|_| NotifyError::Config("MAIL_API_KEY"))?;
        let from = std::env::var("MAIL_FROM").map_err(|_| NotifyError::Config("MAIL_FROM"))?;
        Ok(Self::new(api_url, api_key, from))
    }
}

#[async_trait]
impl NotificationGateway for MailClient {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": alert.to }] }],
            "from": { "email": self.from },
            "subject": template::subject(alert),
            "content": [
                { "type": "text/plain", "value": template::text_body(alert) },
                { "type": "text/html", "value": template::html_body(alert) },
            ],
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        log::info!("guardian alert sent to {}", alert.to);
        Ok(())
    }
}
