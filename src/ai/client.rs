//! Gemini API client module
//!
//! Encapsulates the `generateContent` call used by the help agent.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::core::config::GeminiConfig;
use crate::errors::ServiceError;

/// A model that answers one user message under a system instruction.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// # Errors
    ///
    /// [`ServiceError::GeminiStatus`] for a non-success answer,
    /// [`ServiceError::HttpError`] or [`ServiceError::GeminiError`] when the
    /// call or decoding fails.
    async fn generate(&self, system_prompt: &str, message: &str)
    -> Result<ChatReply, ServiceError>;
}

/// Text of the first candidate, if the model produced any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub text: Option<String>,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

impl GenerateContentRequest {
    #[must_use]
    pub fn new(system_prompt: &str, message: &str) -> Self {
        Self {
            contents: vec![Content::text(message)],
            system_instruction: Content::text(system_prompt),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct GeminiClient {
    http: Client,
    endpoint: Url,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`ServiceError::GeminiError`] if the endpoint URL cannot be built
    /// from the configured base URL and model.
    pub fn new(http: Client, config: &GeminiConfig) -> Result<Self, ServiceError> {
        let mut endpoint = config
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", config.model))
            .map_err(|e| ServiceError::GeminiError(format!("Invalid Gemini endpoint: {e}")))?;
        endpoint
            .query_pairs_mut()
            .append_pair("key", &config.api_key);

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<ChatReply, ServiceError> {
        let request = GenerateContentRequest::new(system_prompt, message);

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::HttpError(format!("Gemini API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = status.as_u16(), body = %body, "Gemini API error");
            return Err(ServiceError::GeminiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            ServiceError::GeminiError(format!("Failed to parse Gemini response: {e}"))
        })?;

        debug!(candidates = parsed.candidates.len(), "Gemini response received");

        Ok(ChatReply {
            text: parsed.first_text().map(ToString::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_system_instruction() {
        let body = serde_json::to_value(GenerateContentRequest::new("be nice", "hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "hello" }] }],
                "systemInstruction": { "parts": [{ "text": "be nice" }] }
            })
        );
    }

    #[test]
    fn first_text_handles_missing_candidates() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": {} }] })).unwrap();
        assert_eq!(no_parts.first_text(), None);

        let full: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hi!" }, { "text": "ignored" }] } }]
        }))
        .unwrap();
        assert_eq!(full.first_text(), Some("Hi!"));
    }

    #[test]
    fn endpoint_carries_model_and_key() {
        let config = GeminiConfig {
            api_key: "secret".into(),
            model: "gemini-1.5-flash".into(),
            base_url: Url::parse("https://generativelanguage.googleapis.com/").unwrap(),
        };
        let client = GeminiClient::new(Client::new(), &config).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=secret"
        );
    }
}
