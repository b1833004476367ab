//! CreateUserHandler - Command handler for registering a respondent.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::AnswerStore;

/// Handler for creating users with a fresh id.
pub struct CreateUserHandler {
    store: Arc<dyn AnswerStore>,
}

impl CreateUserHandler {
    pub fn new(store: Arc<dyn AnswerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<UserId, DomainError> {
        let user_id = UserId::generate();
        self.store.create_user(&user_id).await?;
        info!(user_id = %user_id, "User created");
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryAnswerStore;

    #[tokio::test]
    async fn creates_distinct_empty_users() {
        let store = Arc::new(InMemoryAnswerStore::new());
        let handler = CreateUserHandler::new(store.clone());

        let first = handler.handle().await.unwrap();
        let second = handler.handle().await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.user_count().await, 2);
        let answers = store.get_user(&first).await.unwrap().unwrap();
        assert!(answers.answers.is_empty());
    }
}
