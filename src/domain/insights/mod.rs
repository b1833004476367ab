//! Insights module - events, prompts and payload extraction.
//!
//! - `event` - `InsightEvent` published through the broker
//! - `prompt` - Generator prompts built from scores
//! - `extract` - Balanced-brace JSON recovery from generator output

mod event;
mod extract;
mod prompt;

pub use event::{InsightEvent, InsightEventKind, HOLISTIC};
pub use extract::extract_json;
pub use prompt::Prompt;

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Errors from producing an insight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    #[error("no JSON object found in generated text")]
    NoJsonFound,

    #[error("text generation failed: {0}")]
    Generation(String),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("answer store error: {0}")]
    Store(String),

    #[error("insight generation is shutting down")]
    ShuttingDown,
}

impl From<InsightError> for DomainError {
    fn from(err: InsightError) -> Self {
        match &err {
            InsightError::UserNotFound(id) => DomainError::user_not_found(id),
            InsightError::UnknownDimension(_) => {
                DomainError::new(ErrorCode::InvalidDimension, err.to_string())
            }
            InsightError::Store(msg) => DomainError::store(msg.clone()),
            InsightError::NoJsonFound | InsightError::Generation(_) => {
                DomainError::new(ErrorCode::GenerationFailed, err.to_string())
            }
            InsightError::ShuttingDown => DomainError::new(ErrorCode::InternalError, err.to_string()),
        }
    }
}
