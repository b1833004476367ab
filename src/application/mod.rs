//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) and query handlers (read) are kept separate.

pub mod handlers;

pub use handlers::{
    // Questionnaire handlers
    AnswerInput, CreateUserHandler, GetDailyHandler, GetDailyQuery, GetDailyResult, GetNextQuestionsHandler,
    GetNextQuestionsQuery, ResetUserCommand, ResetUserHandler, SubmitAnswersCommand, SubmitAnswersError,
    SubmitAnswersHandler, SubmitAnswersResult,
    // Insight handlers
    insight_stream, GetInsightsHandler, GetInsightsQuery, GetInsightsResult, InsightCoordinator,
    InsightCoordinatorConfig, StreamFrame, DEFAULT_HEARTBEAT,
};
