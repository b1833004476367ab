//! HTTP handlers for questionnaire endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::identity::CurrentUser;
use crate::application::handlers::questionnaire::{
    CreateUserHandler, GetDailyHandler, GetDailyQuery, GetNextQuestionsHandler, GetNextQuestionsQuery,
    ResetUserCommand, ResetUserHandler, SubmitAnswersCommand, SubmitAnswersHandler,
};
use crate::domain::foundation::Timestamp;

use super::dto::{
    CreateUserResponse, DailyResponse, NextQuestionsParams, NextQuestionsResponse, SubmitAnswersRequest,
    SubmitAnswersResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct QuestionnaireHandlers {
    next_handler: Arc<GetNextQuestionsHandler>,
    submit_handler: Arc<SubmitAnswersHandler>,
    create_user_handler: Arc<CreateUserHandler>,
    reset_handler: Arc<ResetUserHandler>,
    daily_handler: Arc<GetDailyHandler>,
}

impl QuestionnaireHandlers {
    pub fn new(
        next_handler: Arc<GetNextQuestionsHandler>,
        submit_handler: Arc<SubmitAnswersHandler>,
        create_user_handler: Arc<CreateUserHandler>,
        reset_handler: Arc<ResetUserHandler>,
        daily_handler: Arc<GetDailyHandler>,
    ) -> Self {
        Self {
            next_handler,
            submit_handler,
            create_user_handler,
            reset_handler,
            daily_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /v1/questions - Next batch of questions
pub async fn next_questions(
    State(handlers): State<QuestionnaireHandlers>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<NextQuestionsParams>,
) -> Result<Json<NextQuestionsResponse>, ApiError> {
    let query = GetNextQuestionsQuery {
        user_id,
        priority_dimension: params.dimension,
        limit: params.limit,
    };

    let questions = handlers.next_handler.handle(query).await?;
    Ok(Json(questions.into()))
}

/// POST /v1/responses - Submit a batch of answers
pub async fn submit_answers(
    State(handlers): State<QuestionnaireHandlers>,
    CurrentUser(user_id): CurrentUser,
    body: Result<Json<SubmitAnswersRequest>, JsonRejection>,
) -> Result<Json<SubmitAnswersResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let cmd = SubmitAnswersCommand {
        user_id,
        answers: req.answers.into_iter().map(Into::into).collect(),
    };

    let result = handlers.submit_handler.handle(cmd).await?;
    Ok(Json(result.into()))
}

/// POST /v1/users - Create a user
pub async fn create_user(State(handlers): State<QuestionnaireHandlers>) -> Result<Response, ApiError> {
    let user_id = handlers.create_user_handler.handle().await?;
    let response = CreateUserResponse {
        user_id: user_id.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// POST /v1/reset - Clear the caller's answers and insights
pub async fn reset_user(
    State(handlers): State<QuestionnaireHandlers>,
    CurrentUser(user_id): CurrentUser,
) -> Result<StatusCode, ApiError> {
    handlers.reset_handler.handle(ResetUserCommand { user_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/daily - Visit streak, today's paragraph and a few questions
pub async fn daily(
    State(handlers): State<QuestionnaireHandlers>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DailyResponse>, ApiError> {
    let query = GetDailyQuery {
        user_id,
        now: Timestamp::now(),
    };

    let result = handlers.daily_handler.handle(query).await?;
    Ok(Json(result.into()))
}
