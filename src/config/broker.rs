//! Insight broker configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::broker::DEFAULT_COMMAND_CAPACITY;

use super::error::ValidationError;

/// Broker queue sizes and stream keep-alive
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Bounded command queue length
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Events buffered per subscription before drops
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,

    /// Heartbeat period for event streams, in seconds
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

impl BrokerConfig {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.command_capacity == 0 {
            return Err(ValidationError::MustBePositive("broker.command_capacity"));
        }
        if self.subscriber_buffer == 0 {
            return Err(ValidationError::MustBePositive("broker.subscriber_buffer"));
        }
        if self.heartbeat_secs == 0 {
            return Err(ValidationError::MustBePositive("broker.heartbeat_secs"));
        }
        Ok(())
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            command_capacity: default_command_capacity(),
            subscriber_buffer: default_subscriber_buffer(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

fn default_command_capacity() -> usize {
    DEFAULT_COMMAND_CAPACITY
}

fn default_subscriber_buffer() -> usize {
    8
}

fn default_heartbeat_secs() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_defaults() {
        let config = BrokerConfig::default();
        assert_eq!(config.command_capacity, 1024);
        assert_eq!(config.subscriber_buffer, 8);
        assert_eq!(config.heartbeat(), Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_is_invalid() {
        let config = BrokerConfig {
            subscriber_buffer: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MustBePositive("broker.subscriber_buffer"))
        );
    }
}
