//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text generators (OpenAI, mock)
//! - `broker` - Per-user insight pub/sub actor
//! - `http` - REST API and SSE stream (axum)
//! - `questions` - CSV question source
//! - `store` - In-memory answer store

pub mod ai;
pub mod broker;
pub mod http;
pub mod questions;
pub mod store;

pub use ai::{MockTextGenerator, OpenAiConfig, OpenAiTextGenerator};
pub use broker::{InsightBroker, Subscription};
pub use questions::CsvQuestionSource;
pub use store::InMemoryAnswerStore;
