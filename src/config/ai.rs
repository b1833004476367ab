//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Text generation provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key; without one, a mock generator is used outside production
    pub openai_api_key: Option<String>,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Standing instructions for dimension insights
    #[serde(default = "default_dimension_instructions")]
    pub dimension_instructions: String,

    /// Standing instructions for the holistic insight
    #[serde(default = "default_holistic_instructions")]
    pub holistic_instructions: String,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if production && !self.has_openai() {
            return Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            dimension_instructions: default_dimension_instructions(),
            holistic_instructions: default_holistic_instructions(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_dimension_instructions() -> String {
    "You are a wellbeing coach. Given facet ratings from 1 to 10 for one dimension of a \
     self-assessment, reply with a JSON object with the keys \"title\", \"summary\", \
     \"strengths\" and \"growth_areas\"."
        .to_string()
}

fn default_holistic_instructions() -> String {
    "You are a wellbeing coach. Given dimension and facet ratings from 1 to 10, lowest first, \
     reply with a JSON object with the keys \"title\", \"summary\" and \"priorities\"."
        .to_string()
}
