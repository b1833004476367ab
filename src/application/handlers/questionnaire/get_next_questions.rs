//! GetNextQuestionsHandler - Query handler for the next question batch.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::selection::{SelectionEngine, SelectionError, SelectionPolicy};
use crate::domain::taxonomy::Question;
use crate::ports::AnswerStore;

/// Query for the next questions to present.
#[derive(Debug, Clone)]
pub struct GetNextQuestionsQuery {
    pub user_id: UserId,
    /// Dimension to walk first; blank means score order.
    pub priority_dimension: Option<String>,
    /// Cap on returned questions. `None` returns one whole batch.
    pub limit: Option<usize>,
}

/// Handler for selecting the next questions.
pub struct GetNextQuestionsHandler {
    engine: SelectionEngine,
    store: Arc<dyn AnswerStore>,
}

impl GetNextQuestionsHandler {
    pub fn new(engine: SelectionEngine, store: Arc<dyn AnswerStore>) -> Self {
        Self { engine, store }
    }

    pub async fn handle(&self, query: GetNextQuestionsQuery) -> Result<Vec<Question>, SelectionError> {
        // 1. Load the user's snapshot
        let answers = self
            .store
            .get_user(&query.user_id)
            .await
            .map_err(|e| SelectionError::Store(e.to_string()))?
            .ok_or_else(|| SelectionError::UserNotFound(query.user_id.clone()))?;

        // 2. Select under the requested policy
        let policy = SelectionPolicy::from_priority(query.priority_dimension);
        match query.limit {
            Some(cap) => self.engine.next_window(&answers, &policy, cap),
            None => self.engine.next_questions(&answers, &policy),
        }
    }
}
