//! Questionnaire handlers.
//!
//! - `get_next_questions` - Next batch or capped window of questions
//! - `get_daily` - Visit streak, daily paragraph and a short question window
//! - `submit_answers` - Batch answer submission and insight hand-off
//! - `create_user` - Mint a new respondent
//! - `reset_user` - Clear answers and insights

mod create_user;
mod get_daily;
mod get_next_questions;
mod reset_user;
mod submit_answers;

pub use create_user::CreateUserHandler;
pub use get_daily::{GetDailyHandler, GetDailyQuery, GetDailyResult, DAILY_QUESTION_COUNT};
pub use get_next_questions::{GetNextQuestionsHandler, GetNextQuestionsQuery};
pub use reset_user::{ResetUserCommand, ResetUserHandler};
pub use submit_answers::{
    AnswerInput, SubmitAnswersCommand, SubmitAnswersError, SubmitAnswersHandler, SubmitAnswersResult,
};
