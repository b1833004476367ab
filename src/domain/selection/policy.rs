//! Selection policies and errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Decides where the dimension walk starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Score dimensions and walk the lowest-scoring one first.
    #[default]
    LowestDimensionFirst,
    /// Start the walk at the named dimension, then continue in scored order.
    PriorityDimension(String),
}

impl SelectionPolicy {
    /// Builds a policy from an optional pinned dimension name.
    pub fn from_priority(dimension: Option<String>) -> Self {
        match dimension {
            Some(name) if !name.trim().is_empty() => SelectionPolicy::PriorityDimension(name),
            _ => SelectionPolicy::LowestDimensionFirst,
        }
    }

    pub fn priority_dimension(&self) -> Option<&str> {
        match self {
            SelectionPolicy::PriorityDimension(name) => Some(name),
            SelectionPolicy::LowestDimensionFirst => None,
        }
    }
}

/// Errors from selecting the next batch of questions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("answer store error: {0}")]
    Store(String),
}

impl From<SelectionError> for DomainError {
    fn from(err: SelectionError) -> Self {
        match &err {
            SelectionError::UserNotFound(id) => DomainError::user_not_found(id),
            SelectionError::InvalidDimension(name) => {
                DomainError::new(ErrorCode::InvalidDimension, err.to_string())
                    .with_detail("dimension", name.clone())
            }
            SelectionError::Store(msg) => DomainError::store(msg.clone()),
        }
    }
}
