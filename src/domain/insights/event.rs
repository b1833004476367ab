//! Insight events carried by the broker.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Name under which the cross-dimension insight is stored and published.
pub const HOLISTIC: &str = "holistic";

/// Outcome an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightEventKind {
    Ready,
    Failed,
}

/// Transient pub/sub message for one user's insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightEvent {
    pub name: String,
    pub user_id: UserId,
    pub kind: InsightEventKind,
    pub payload: serde_json::Value,
}

impl InsightEvent {
    pub fn ready(user_id: UserId, name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            user_id,
            kind: InsightEventKind::Ready,
            payload,
        }
    }

    pub fn failed(user_id: UserId, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_id,
            kind: InsightEventKind::Failed,
            payload: serde_json::json!({ "error": reason.into() }),
        }
    }

    pub fn is_holistic(&self) -> bool {
        self.name == HOLISTIC
    }
}
