//! Mock text generator for testing.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Error injection for retry testing
//! - Simulated delays
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::insights::Prompt;
use crate::ports::{GenerationError, GeneratorInfo, TextGenerator};

/// Output returned once the queue is empty.
pub const DEFAULT_MOCK_OUTPUT: &str = r#"{"title":"Mock insight","summary":"Mock summary"}"#;

/// Mock text generator.
#[derive(Debug, Clone, Default)]
pub struct MockTextGenerator {
    responses: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<Prompt>>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful output.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<Prompt> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<String, GenerationError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_MOCK_OUTPUT.to_string()))
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(prompt.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_response()
    }

    fn generator_info(&self) -> GeneratorInfo {
        GeneratorInfo::new("mock", "mock-model-1")
    }
}
