use crate::error::ApiError;
use crate::state::AppState;
use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

/// The caller, as proven by a valid bearer token.
///
/// Put `user: AuthenticatedUser` in a handler's arguments and axum will:
/// 1. Pull `Authorization: Bearer <token>` off the request
/// 2. Verify the token with the app's `TokenIssuer`
/// 3. Hand over the user id, or answer 403 without ever calling the handler
///
/// Extractors run before the body is read and before the handler body, so a
/// rejected request never reaches the store.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| {
                tracing::debug!("Missing or malformed Authorization header: {}", e);
                ApiError::AuthorizationFailure
            })?;

        let user_id = state.tokens.verify(bearer.token())?;

        Ok(AuthenticatedUser { user_id })
    }
}
