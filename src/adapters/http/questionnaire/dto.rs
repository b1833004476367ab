//! HTTP DTOs for questionnaire endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::questionnaire::{AnswerInput, GetDailyResult, SubmitAnswersResult};
use crate::domain::daily::Paragraph;
use crate::domain::taxonomy::Question;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for the next questions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuestionsParams {
    /// Dimension to walk first.
    #[serde(default)]
    pub dimension: Option<String>,
    /// Cap on returned questions.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One answer in a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    #[serde(rename = "questionid")]
    pub question_id: u32,
    #[serde(default)]
    pub value: Option<i32>,
    pub kind: String,
}

/// Request body for answer submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<AnswerRequest>,
}

impl From<AnswerRequest> for AnswerInput {
    fn from(req: AnswerRequest) -> Self {
        Self {
            question_id: req.question_id,
            kind: req.kind,
            value: req.value,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Question as shown to the respondent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: u32,
    pub text: String,
    pub min_label: String,
    pub max_label: String,
    pub dimension: String,
    pub sub_dimension: String,
    pub facet: String,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.value(),
            text: q.text,
            min_label: q.min_label,
            max_label: q.max_label,
            dimension: q.dimension,
            sub_dimension: q.sub_dimension,
            facet: q.facet,
        }
    }
}

/// Next batch of questions; empty once the questionnaire is complete.
#[derive(Debug, Clone, Serialize)]
pub struct NextQuestionsResponse {
    pub questions: Vec<QuestionResponse>,
    pub complete: bool,
}

impl From<Vec<Question>> for NextQuestionsResponse {
    fn from(questions: Vec<Question>) -> Self {
        Self {
            complete: questions.is_empty(),
            questions: questions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of an answer submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersResponse {
    pub stored: usize,
    pub failed: usize,
    pub insights_started: Vec<String>,
}

impl From<SubmitAnswersResult> for SubmitAnswersResponse {
    fn from(result: SubmitAnswersResult) -> Self {
        Self {
            stored: result.stored,
            failed: result.failed,
            insights_started: result.insights_started,
        }
    }
}

/// Newly created user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: String,
}

/// Daily view: streak, today's paragraph and a few questions.
#[derive(Debug, Clone, Serialize)]
pub struct DailyResponse {
    pub streak: u32,
    pub paragraph: Option<Paragraph>,
    pub questions: Vec<QuestionResponse>,
}

impl From<GetDailyResult> for DailyResponse {
    fn from(result: GetDailyResult) -> Self {
        Self {
            streak: result.streak,
            paragraph: result.paragraph,
            questions: result.questions.into_iter().map(Into::into).collect(),
        }
    }
}
