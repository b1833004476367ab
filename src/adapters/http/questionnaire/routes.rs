//! HTTP routes for questionnaire endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_user, daily, next_questions, reset_user, submit_answers, QuestionnaireHandlers};

/// Creates the questionnaire router.
pub fn questionnaire_routes(handlers: QuestionnaireHandlers) -> Router {
    Router::new()
        .route("/questions", get(next_questions))
        .route("/responses", post(submit_answers))
        .route("/users", post(create_user))
        .route("/reset", post(reset_user))
        .route("/daily", get(daily))
        .with_state(handlers)
}
