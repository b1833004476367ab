//! Insight status lifecycle and stored insight record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, Timestamp};

/// Lifecycle of a generated insight.
///
/// ```text
/// Unset ──► Generating ──► Done
///               │  ▲
///               ▼  │
///             Failed
/// ```
///
/// `Failed → Generating` only happens when a later submission starts a
/// fresh attempt; there is no way back from `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightStatus {
    #[default]
    Unset,
    Generating,
    Done,
    Failed,
}

impl InsightStatus {
    /// True for the states from which a new generation may be started.
    pub fn needs_generation(&self) -> bool {
        matches!(self, InsightStatus::Unset | InsightStatus::Failed)
    }
}

impl StateMachine for InsightStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InsightStatus::*;
        matches!(
            (self, target),
            (Unset, Generating) | (Generating, Done) | (Generating, Failed) | (Failed, Generating)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InsightStatus::*;
        match self {
            Unset => vec![Generating],
            Generating => vec![Done, Failed],
            Failed => vec![Generating],
            Done => vec![],
        }
    }
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InsightStatus::Unset => "UNSET",
            InsightStatus::Generating => "GENERATING",
            InsightStatus::Done => "DONE",
            InsightStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Stored insight: status plus opaque JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub status: InsightStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at: Timestamp,
}

impl Insight {
    pub fn new(status: InsightStatus, payload: Option<serde_json::Value>) -> Self {
        Self {
            status,
            payload,
            error: None,
            updated_at: Timestamp::now(),
        }
    }

    pub fn generating() -> Self {
        Self::new(InsightStatus::Generating, None)
    }

    pub fn done(payload: serde_json::Value) -> Self {
        Self::new(InsightStatus::Done, Some(payload))
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::new(InsightStatus::Failed, None)
        }
    }
}
