//! Answer store port.
//!
//! Defines the contract for the external store that owns every user's
//! answers and insights. The core reads snapshots from it and writes single
//! answers or insights back; nothing is cached in between.
//!
//! # Design
//!
//! - **No multi-write transactions**: a batch of answers is written one at a
//!   time and may fail part way through
//! - **Insight entry guard**: `try_begin_insight` is the single place where
//!   concurrent generators race; only the winner proceeds

use async_trait::async_trait;

use crate::domain::answers::{AnswerEvent, Insight, UserAnswers};
use crate::domain::daily::NewDay;
use crate::domain::foundation::{DomainError, QuestionId, UserId};

/// Port for per-user answer and insight persistence.
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Creates an empty record for a new user.
    ///
    /// Creating an existing user leaves its record untouched.
    async fn create_user(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Reads the current snapshot for a user.
    ///
    /// Returns `None` if the user does not exist.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserAnswers>, DomainError>;

    /// Replaces the latest answer to one question.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `StoreError` on persistence failure
    async fn upsert_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        event: AnswerEvent,
    ) -> Result<(), DomainError>;

    /// Writes an insight record unconditionally.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `StoreError` on persistence failure
    async fn upsert_insight(
        &self,
        user_id: &UserId,
        name: &str,
        insight: Insight,
    ) -> Result<(), DomainError>;

    /// Atomically moves an insight to `Generating` if it is absent, unset or
    /// failed.
    ///
    /// Returns `false` when another caller already holds the insight (it is
    /// generating or done).
    async fn try_begin_insight(&self, user_id: &UserId, name: &str) -> Result<bool, DomainError>;

    /// Clears all answers and insights of a user.
    ///
    /// The visit streak and shown paragraphs are kept.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn reset_user(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Records a new visit day: streak, visit time and the paragraph shown.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `StoreError` on persistence failure
    async fn new_day(&self, user_id: &UserId, day: &NewDay) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn AnswerStore) {}
    }
}
