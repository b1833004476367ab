//! HTTP error mapping shared by every route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        let details = (!err.details.is_empty())
            .then(|| serde_json::to_value(&err.details).ok())
            .flatten();
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
            details,
        }
    }
}

/// Domain error carried to the HTTP boundary.
#[derive(Debug, Clone)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::new(ErrorCode::ValidationFailed, message))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.code {
            ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidDimension
            | ErrorCode::QuestionNotFound => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidStateTransition
            | ErrorCode::GenerationFailed
            | ErrorCode::StoreError
            | ErrorCode::BrokerClosed
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = %self.0.code, error = %self.0.message, "Request failed");
            return (status, Json(ErrorResponse::internal(self.0.message))).into_response();
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::selection::SelectionError;

    #[test]
    fn user_not_found_maps_to_404() {
        let err: ApiError = SelectionError::UserNotFound(UserId::new("u").unwrap()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_dimension_maps_to_400() {
        let err: ApiError = SelectionError::InvalidDimension("x".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_500() {
        let err: ApiError = DomainError::store("down").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn details_are_included_for_client_errors() {
        let err = DomainError::user_not_found("u7");
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "USER_NOT_FOUND");
        assert_eq!(body.details.unwrap()["user_id"], "u7");
    }
}
