//! Text generator port - Interface for the external language model.
//!
//! The generator turns a [`Prompt`] into raw text. Output is not guaranteed
//! to be well-formed JSON; callers extract the payload themselves.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl TextGenerator for Echo {
//!     async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
//!         Ok(format!("{{\"echo\": {:?}}}", prompt.input))
//!     }
//!
//!     fn generator_info(&self) -> GeneratorInfo {
//!         GeneratorInfo::new("echo", "none")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::insights::Prompt;

/// Port for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates raw text for the prompt. One attempt; callers retry.
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    /// Name and model of the backing service.
    fn generator_info(&self) -> GeneratorInfo;
}

/// Identifies a generator implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub model: String,
}

impl GeneratorInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Text generation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Output contained no usable JSON object.
    #[error("no JSON object found in generated text")]
    NoJsonFound,
}

impl GenerationError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a later attempt may succeed.
    ///
    /// Model output varies between attempts, so missing JSON is retried too.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
                | GenerationError::NoJsonFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn TextGenerator) {}
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(GenerationError::rate_limited(3).is_retryable());
        assert!(GenerationError::unavailable("503").is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(GenerationError::NoJsonFound.is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::InvalidRequest("bad".into()).is_retryable());
        assert!(!GenerationError::parse("garbled").is_retryable());
    }

    #[test]
    fn rate_limited_displays_delay() {
        assert_eq!(
            GenerationError::rate_limited(12).to_string(),
            "rate limited: retry after 12s"
        );
    }
}
