//! HTTP adapter for questionnaire endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AnswerRequest, CreateUserResponse, DailyResponse, NextQuestionsParams, NextQuestionsResponse,
    QuestionResponse, SubmitAnswersRequest, SubmitAnswersResponse,
};
pub use handlers::QuestionnaireHandlers;
pub use routes::questionnaire_routes;
