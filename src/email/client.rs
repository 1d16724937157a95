//! Resend API client module
//!
//! Sends one transactional email per call. Failures are reported to the
//! caller as-is; nothing here retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use url::Url;
use uuid::Uuid;

use super::templates::RenderedEmail;
use crate::core::config::ResendConfig;
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl OutgoingEmail {
    #[must_use]
    pub fn new(from: &str, to: &str, rendered: RenderedEmail) -> Self {
        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Returns the provider's response body on success.
    ///
    /// # Errors
    ///
    /// [`ServiceError::EmailRejected`] when the provider refuses the message,
    /// [`ServiceError::HttpError`] when it cannot be reached.
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, ServiceError>;
}

pub struct ResendClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl ResendClient {
    /// # Errors
    ///
    /// Returns [`ServiceError::HttpError`] if the endpoint URL cannot be built.
    pub fn new(http: Client, config: &ResendConfig) -> Result<Self, ServiceError> {
        let endpoint = config
            .base_url
            .join("emails")
            .map_err(|e| ServiceError::HttpError(format!("Invalid Resend endpoint: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, ServiceError> {
        info!(
            to = ?email.to,
            subject = %email.subject,
            html_length = email.html.len(),
            "Sending email via Resend API"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        let data = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));

        info!(status = status.as_u16(), "Resend API response");

        if status.is_success() {
            info!(email_id = ?data.get("id"), "Email sent successfully");
            Ok(data)
        } else {
            error!(status = status.as_u16(), details = %data, "Resend API error");
            Err(ServiceError::EmailRejected {
                status: status.as_u16(),
                details: data,
            })
        }
    }
}
