//! Caller identity taken from the `x-user-id` header.
//!
//! There is no authentication: the header is trusted as given.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::foundation::UserId;

use super::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the calling user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::bad_request(format!("missing {} header", USER_ID_HEADER)))?;

        let user_id = UserId::new(raw.trim())?;
        Ok(CurrentUser(user_id))
    }
}
