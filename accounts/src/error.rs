use crate::db::StoreError;
use crate::models::user::MessageResponse;
use crate::utils::token::TokenError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 411 is what existing clients expect for every rejected input, so we keep it.
pub const CLIENT_ERROR: StatusCode = StatusCode::LENGTH_REQUIRED;

pub const SIGNUP_REJECTED: &str = "Email already taken / Incorrect inputs";
pub const SIGNIN_REJECTED: &str = "Error while logging in";
pub const UPDATE_REJECTED: &str = "Error while updating information";
pub const SEARCH_REJECTED: &str = "Invalid search filter";

/// Everything a request can fail with.
///
/// Each variant carries the message the client sees. Signup uses the same
/// text for `InvalidInput` and `DuplicateIdentity` so callers can't probe
/// which usernames exist.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("{0}")]
    DuplicateIdentity(&'static str),

    #[error("{0}")]
    AuthenticationFailure(&'static str),

    #[error("Unauthorized")]
    AuthorizationFailure,

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::DuplicateIdentity(_)
            | ApiError::AuthenticationFailure(_) => CLIENT_ERROR,
            ApiError::AuthorizationFailure => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidToken => ApiError::AuthorizationFailure,
            TokenError::Signing(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal details go to the log, never to the client.
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Request failed: {}", detail);
        }

        let body = MessageResponse {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_failures_use_411() {
        assert_eq!(ApiError::InvalidInput(SIGNUP_REJECTED).status().as_u16(), 411);
        assert_eq!(ApiError::DuplicateIdentity(SIGNUP_REJECTED).status().as_u16(), 411);
        assert_eq!(ApiError::AuthenticationFailure(SIGNIN_REJECTED).status().as_u16(), 411);
    }

    #[test]
    fn invalid_token_maps_to_forbidden() {
        let err: ApiError = TokenError::InvalidToken.into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_message_hides_detail() {
        let err: ApiError = StoreError::Backend("connection reset".to_string()).into();
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
