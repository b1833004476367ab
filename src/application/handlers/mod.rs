//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `questionnaire` - Question selection, answer submission, user lifecycle
//! - `insights` - Insight generation, reads and streaming delivery

pub mod insights;
pub mod questionnaire;

pub use insights::{
    insight_stream, GetInsightsHandler, GetInsightsQuery, GetInsightsResult, InsightCoordinator,
    InsightCoordinatorConfig, StreamFrame, DEFAULT_HEARTBEAT,
};
pub use questionnaire::{
    AnswerInput, CreateUserHandler, GetDailyHandler, GetDailyQuery, GetDailyResult, GetNextQuestionsHandler,
    GetNextQuestionsQuery, ResetUserCommand, ResetUserHandler, SubmitAnswersCommand, SubmitAnswersError,
    SubmitAnswersHandler, SubmitAnswersResult,
};
