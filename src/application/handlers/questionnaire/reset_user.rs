//! ResetUserHandler - Command handler for clearing a user's progress.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::AnswerStore;

/// Command to clear all answers and insights of a user.
#[derive(Debug, Clone)]
pub struct ResetUserCommand {
    pub user_id: UserId,
}

/// Handler for resetting users.
pub struct ResetUserHandler {
    store: Arc<dyn AnswerStore>,
}

impl ResetUserHandler {
    pub fn new(store: Arc<dyn AnswerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: ResetUserCommand) -> Result<(), DomainError> {
        self.store.reset_user(&cmd.user_id).await?;
        info!(user_id = %cmd.user_id, "User reset");
        Ok(())
    }
}
