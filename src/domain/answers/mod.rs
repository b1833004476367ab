//! Answers module - per-user answer snapshots and derived progress.
//!
//! - `answer` - Answer events and the `UserAnswers` snapshot
//! - `insight` - Insight record and its status lifecycle
//! - `progress` - Unanswered/complete derivations against the catalog

mod answer;
mod insight;
mod progress;

pub use answer::{AnswerEvent, AnswerKind, UserAnswers};
pub use insight::{Insight, InsightStatus};
pub use progress::ProgressView;
