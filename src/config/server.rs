//! HTTP listener and runtime mode

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Longest accepted time to a response head, in seconds
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Listener address, log filter and browser access
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// `host:port` the listener binds
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Emits JSON logs and requires a real text generator
    #[serde(default)]
    pub production: bool,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Seconds allowed before a response head is sent
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Allowed browser origins (comma-separated); empty allows any
    #[serde(default)]
    pub cors_origins: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        self.bind
            .parse()
            .map_err(|_| ValidationError::InvalidSocketAddr(self.bind.clone()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        super::split_list(&self.cors_origins)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.socket_addr()?.port() == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            production: false,
            log_filter: default_log_filter(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_origins: String::new(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_filter() -> String {
    "info,wellbeing_survey=debug".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
