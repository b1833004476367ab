//! In-memory answer store.
//!
//! Reference implementation of [`AnswerStore`] used by the binary and by
//! tests. State lives for the lifetime of the process.
//!
//! The insight entry guard is a read-check-write under a single write lock,
//! so concurrent `try_begin_insight` calls for the same key have exactly one
//! winner.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::answers::{AnswerEvent, Insight, InsightStatus, UserAnswers};
use crate::domain::daily::NewDay;
use crate::domain::foundation::{DomainError, QuestionId, StateMachine, UserId};
use crate::ports::AnswerStore;

/// Answer store backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryAnswerStore {
    users: RwLock<HashMap<UserId, UserAnswers>>,
}

impl InMemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a full snapshot, replacing any existing record (for tests).
    pub async fn insert(&self, answers: UserAnswers) {
        self.users
            .write()
            .await
            .insert(answers.user_id.clone(), answers);
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl AnswerStore for InMemoryAnswerStore {
    async fn create_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.users
            .write()
            .await
            .entry(user_id.clone())
            .or_insert_with(|| UserAnswers::new(user_id.clone()));
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserAnswers>, DomainError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn upsert_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        event: AnswerEvent,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        user.record(question_id, event);
        Ok(())
    }

    async fn upsert_insight(
        &self,
        user_id: &UserId,
        name: &str,
        insight: Insight,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        user.insights.insert(name.to_string(), insight);
        Ok(())
    }

    async fn try_begin_insight(&self, user_id: &UserId, name: &str) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let current = user.insight(name).map(|i| i.status).unwrap_or_default();
        if current.transition_to(InsightStatus::Generating).is_err() {
            return Ok(false);
        }
        user.insights.insert(name.to_string(), Insight::generating());
        Ok(true)
    }

    async fn reset_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        user.answers.clear();
        user.insights.clear();
        Ok(())
    }

    async fn new_day(&self, user_id: &UserId, day: &NewDay) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        user.start_day(day);
        Ok(())
    }
}
