//! Answer events and the per-user answer snapshot.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::domain::daily::NewDay;
use crate::domain::foundation::{QuestionId, Timestamp, UserId, ValidationError};

use super::insight::{Insight, InsightStatus};

/// How a question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerKind {
    /// A value on the question's scale.
    Scale,
    /// The respondent explicitly did not know; carries no value.
    #[serde(rename = "DONTKNOW")]
    DontKnow,
}

impl AnswerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerKind::Scale => "SCALE",
            AnswerKind::DontKnow => "DONTKNOW",
        }
    }
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scale" => Ok(AnswerKind::Scale),
            "dontknow" | "dont_know" | "dont-know" => Ok(AnswerKind::DontKnow),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("unknown answer kind '{}'", other),
            )),
        }
    }
}

/// Latest recorded answer for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub kind: AnswerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    pub updated_at: Timestamp,
}

impl AnswerEvent {
    /// Builds an event, dropping any value supplied with a don't-know answer.
    pub fn new(kind: AnswerKind, value: Option<i32>) -> Self {
        let value = match kind {
            AnswerKind::Scale => value,
            AnswerKind::DontKnow => None,
        };
        Self {
            kind,
            value,
            updated_at: Timestamp::now(),
        }
    }

    pub fn scale(value: i32) -> Self {
        Self::new(AnswerKind::Scale, Some(value))
    }

    pub fn dont_know() -> Self {
        Self::new(AnswerKind::DontKnow, None)
    }
}

/// Snapshot of a user's answers and insights as read from the store.
///
/// The core derives from this snapshot and never caches it across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswers {
    pub user_id: UserId,
    #[serde(default)]
    pub answers: BTreeMap<QuestionId, AnswerEvent>,
    #[serde(default)]
    pub insights: BTreeMap<String, Insight>,
    /// Consecutive calendar days with a visit.
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visited: Option<Timestamp>,
    /// Ids of daily paragraphs already shown.
    #[serde(default)]
    pub shown_paragraphs: BTreeSet<u32>,
}

impl UserAnswers {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            answers: BTreeMap::new(),
            insights: BTreeMap::new(),
            streak: 0,
            last_visited: None,
            shown_paragraphs: BTreeSet::new(),
        }
    }

    /// Builds a snapshot with scale answers, mostly for fixtures.
    pub fn with_scale_answers<I>(user_id: UserId, answers: I) -> Self
    where
        I: IntoIterator<Item = (u32, i32)>,
    {
        let mut snapshot = Self::new(user_id);
        for (id, value) in answers {
            snapshot.record(QuestionId::new(id), AnswerEvent::scale(value));
        }
        snapshot
    }

    /// Replaces the latest answer for a question.
    pub fn record(&mut self, question_id: QuestionId, event: AnswerEvent) {
        self.answers.insert(question_id, event);
    }

    pub fn latest_answer(&self, question_id: QuestionId) -> Option<&AnswerEvent> {
        self.answers.get(&question_id)
    }

    /// True if any answer, including don't-know, is on record.
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.answers.contains_key(&question_id)
    }

    /// Scale value of the latest answer, if it carries one.
    pub fn value_of(&self, question_id: QuestionId) -> Option<i32> {
        self.latest_answer(question_id).and_then(|a| a.value)
    }

    pub fn insight(&self, name: &str) -> Option<&Insight> {
        self.insights.get(name)
    }

    /// True if a finished insight exists under `name`.
    pub fn has_insight(&self, name: &str) -> bool {
        self.insight(name)
            .is_some_and(|i| i.status == InsightStatus::Done)
    }

    /// Paragraph shown most recently, if any.
    pub fn current_paragraph_id(&self) -> Option<u32> {
        self.shown_paragraphs.last().copied()
    }

    /// Paragraph to show on the next new day.
    pub fn next_paragraph_id(&self) -> u32 {
        self.current_paragraph_id().map_or(1, |id| id.saturating_add(1))
    }

    /// Records the start of a new visit day.
    pub fn start_day(&mut self, day: &NewDay) {
        self.streak = day.streak;
        self.last_visited = Some(day.visited_at);
        self.shown_paragraphs.insert(day.paragraph_id);
    }

    /// True if generation should be started for `name`.
    ///
    /// Absent, unset and failed insights need generation; generating and
    /// done ones do not.
    pub fn needs_insight(&self, name: &str) -> bool {
        match self.insight(name) {
            None => true,
            Some(insight) => insight.status.needs_generation(),
        }
    }
}
