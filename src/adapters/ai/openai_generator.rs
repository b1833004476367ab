//! OpenAI text generator - Implementation of `TextGenerator` over the chat
//! completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let generator = OpenAiTextGenerator::new(config)?;
//! ```
//!
//! A single request is made per call. Retrying is left to the caller, which
//! knows whether the insight is still wanted.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::insights::Prompt;
use crate::ports::{GenerationError, GeneratorInfo, TextGenerator};

/// Configuration for the OpenAI generator.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-backed text generator.
pub struct OpenAiTextGenerator {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiTextGenerator {
    /// Creates a generator, failing if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, prompt: &Prompt) -> OpenAiRequest {
        let mut messages = Vec::with_capacity(2);
        if !prompt.instructions.trim().is_empty() {
            messages.push(OpenAiMessage {
                role: "system".to_string(),
                content: prompt.instructions.clone(),
            });
        }
        messages.push(OpenAiMessage {
            role: "user".to_string(),
            content: prompt.input.clone(),
        });

        OpenAiRequest {
            model: self.config.model.clone(),
            messages,
            response_format: Some(ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }

    async fn send_request(&self, prompt: &Prompt) -> Result<Response, GenerationError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&self.to_openai_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses onto generation errors.
    async fn handle_response_status(response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(Self::status_error(status.as_u16(), error_body))
    }

    fn status_error(status: u16, error_body: String) -> GenerationError {
        match status {
            401 | 403 => GenerationError::AuthenticationFailed,
            429 => GenerationError::rate_limited(Self::parse_retry_after(&error_body)),
            400 | 404 | 422 => GenerationError::InvalidRequest(error_body),
            500..=599 => {
                GenerationError::unavailable(format!("Server error {}: {}", status, error_body))
            }
            _ => GenerationError::network(format!("Unexpected status {}: {}", status, error_body)),
        }
    }

    /// Parses "try again in Ns" from a rate-limit body, defaulting to 30s.
    fn parse_retry_after(error_body: &str) -> u32 {
        serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|parsed| {
                let msg = parsed.get("error")?.get("message")?.as_str()?.to_string();
                let idx = msg.find("try again in ")?;
                let rest = &msg[idx + 13..];
                let num_end = rest.find(|c: char| !c.is_ascii_digit())?;
                rest[..num_end].parse::<u32>().ok()
            })
            .unwrap_or(30)
    }

    async fn parse_response(response: Response) -> Result<String, GenerationError> {
        let response = Self::handle_response_status(response).await?;

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse response: {}", e)))?;

        openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::parse("No choices in response"))
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let response = self.send_request(prompt).await?;
        let text = Self::parse_response(response).await?;
        debug!(model = %self.config.model, chars = text.len(), "Received generated text");
        Ok(text)
    }

    fn generator_info(&self) -> GeneratorInfo {
        GeneratorInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = OpenAiConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn request_puts_instructions_in_system_message() {
        let generator = OpenAiTextGenerator::new(OpenAiConfig::new("k")).unwrap();
        let request = generator.to_openai_request(&Prompt::new("be brief", "ratings"));

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "ratings");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn empty_instructions_are_omitted() {
        let generator = OpenAiTextGenerator::new(OpenAiConfig::new("k")).unwrap();
        let request = generator.to_openai_request(&Prompt::new("  ", "ratings"));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let generator =
            OpenAiTextGenerator::new(OpenAiConfig::new("k").with_base_url("http://x/v1/")).unwrap();
        assert_eq!(generator.completions_url(), "http://x/v1/chat/completions");
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert_eq!(
            OpenAiTextGenerator::status_error(401, String::new()),
            GenerationError::AuthenticationFailed
        );
        assert!(OpenAiTextGenerator::status_error(503, "down".into()).is_retryable());
        assert!(!OpenAiTextGenerator::status_error(400, "bad".into()).is_retryable());
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
        assert_eq!(OpenAiTextGenerator::parse_retry_after(error), 12);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(OpenAiTextGenerator::parse_retry_after(error), 30);
    }

    #[test]
    fn generator_info_reports_model() {
        let generator =
            OpenAiTextGenerator::new(OpenAiConfig::new("k").with_model("gpt-4.1")).unwrap();
        assert_eq!(generator.generator_info(), GeneratorInfo::new("openai", "gpt-4.1"));
    }
}
