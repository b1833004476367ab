//! Insight generation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Worker pool, retry and shutdown tuning for insight jobs
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    /// Jobs allowed to call the generator at once
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Attempts per insight, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Time allowed for running jobs at shutdown, in seconds
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl InsightsConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_jobs == 0 {
            return Err(ValidationError::MustBePositive("insights.max_concurrent_jobs"));
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::MustBePositive("insights.max_attempts"));
        }
        Ok(())
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

fn default_max_concurrent_jobs() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_shutdown_grace_secs() -> u64 {
    10
}
