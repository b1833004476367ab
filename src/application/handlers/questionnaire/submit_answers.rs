//! SubmitAnswersHandler - Command handler for a batch of answers.
//!
//! Submission is not atomic. Every item is validated before anything is
//! written; after that, a failed write is logged and the rest of the batch
//! continues. Completed dimensions are then handed to the coordinator.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::handlers::insights::InsightCoordinator;
use crate::domain::answers::{AnswerEvent, AnswerKind, ProgressView};
use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, UserId, ValidationError};
use crate::domain::selection::CompletionDetector;
use crate::domain::taxonomy::Catalog;
use crate::ports::AnswerStore;

/// One submitted answer as received from the caller.
#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub question_id: u32,
    pub kind: String,
    pub value: Option<i32>,
}

/// Command to record a batch of answers.
#[derive(Debug, Clone)]
pub struct SubmitAnswersCommand {
    pub user_id: UserId,
    pub answers: Vec<AnswerInput>,
}

/// Outcome of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitAnswersResult {
    /// Answers written to the store.
    pub stored: usize,
    /// Answers whose write failed.
    pub failed: usize,
    /// Dimensions whose insight generation was started by this call.
    pub insights_started: Vec<String>,
}

/// Errors that abort a submission before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitAnswersError {
    #[error("invalid answer: {0}")]
    Validation(#[from] ValidationError),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("answer store error: {0}")]
    Store(String),
}

impl From<SubmitAnswersError> for DomainError {
    fn from(err: SubmitAnswersError) -> Self {
        match err {
            SubmitAnswersError::Validation(v) => v.into(),
            SubmitAnswersError::UserNotFound(id) => DomainError::user_not_found(id),
            SubmitAnswersError::UnknownQuestion(id) => {
                DomainError::new(ErrorCode::QuestionNotFound, format!("Question {} not found", id))
                    .with_detail("question_id", id.to_string())
            }
            SubmitAnswersError::Store(msg) => DomainError::store(msg),
        }
    }
}

/// Handler for submitting answers.
pub struct SubmitAnswersHandler {
    catalog: Arc<Catalog>,
    store: Arc<dyn AnswerStore>,
    detector: CompletionDetector,
    coordinator: Arc<InsightCoordinator>,
}

impl SubmitAnswersHandler {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn AnswerStore>,
        detector: CompletionDetector,
        coordinator: Arc<InsightCoordinator>,
    ) -> Self {
        Self {
            catalog,
            store,
            detector,
            coordinator,
        }
    }

    pub async fn handle(&self, cmd: SubmitAnswersCommand) -> Result<SubmitAnswersResult, SubmitAnswersError> {
        // 1. Validate the whole batch up front
        let events = self.validate(&cmd.answers)?;

        // 2. The user must exist
        self.store
            .get_user(&cmd.user_id)
            .await
            .map_err(|e| SubmitAnswersError::Store(e.to_string()))?
            .ok_or_else(|| SubmitAnswersError::UserNotFound(cmd.user_id.clone()))?;

        // 3. Write each answer, tolerating per-item failures
        let mut result = SubmitAnswersResult::default();
        for (question_id, event) in events {
            match self.store.upsert_answer(&cmd.user_id, question_id, event).await {
                Ok(()) => result.stored += 1,
                Err(e) => {
                    result.failed += 1;
                    warn!(
                        user_id = %cmd.user_id,
                        question_id = %question_id,
                        error = %e,
                        "Failed to store answer, continuing"
                    );
                }
            }
        }

        // 4. Re-read and hand off completed dimensions
        let answers = self
            .store
            .get_user(&cmd.user_id)
            .await
            .map_err(|e| SubmitAnswersError::Store(e.to_string()))?
            .ok_or_else(|| SubmitAnswersError::UserNotFound(cmd.user_id.clone()))?;

        for dimension in self.detector.complete_dimensions(&answers) {
            if !answers.needs_insight(&dimension) {
                continue;
            }
            match self.coordinator.request_dimension(&cmd.user_id, &dimension).await {
                Ok(true) => result.insights_started.push(dimension),
                Ok(false) => {}
                Err(e) => warn!(
                    user_id = %cmd.user_id,
                    dimension = %dimension,
                    error = %e,
                    "Could not start insight generation"
                ),
            }
        }

        info!(
            user_id = %cmd.user_id,
            stored = result.stored,
            failed = result.failed,
            answered = ProgressView::new(&self.catalog, &answers).answered_count(),
            insights_started = result.insights_started.len(),
            "Answers submitted"
        );
        Ok(result)
    }

    fn validate(&self, inputs: &[AnswerInput]) -> Result<Vec<(QuestionId, AnswerEvent)>, SubmitAnswersError> {
        inputs
            .iter()
            .map(|input| {
                let question_id = QuestionId::new(input.question_id);
                if self.catalog.question(question_id).is_none() {
                    return Err(SubmitAnswersError::UnknownQuestion(question_id));
                }
                let kind: AnswerKind = input.kind.parse()?;
                if kind == AnswerKind::Scale && input.value.is_none() {
                    return Err(ValidationError::empty_field("value").into());
                }
                Ok((question_id, AnswerEvent::new(kind, input.value)))
            })
            .collect()
    }
}
