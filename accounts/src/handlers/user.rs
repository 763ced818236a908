use crate::db::StoreError;
use crate::error::{
    ApiError, SEARCH_REJECTED, SIGNIN_REJECTED, SIGNUP_REJECTED, UPDATE_REJECTED,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{
    BulkQuery, BulkResponse, MessageResponse, NewUser, SigninRequest, SigninResponse,
    SignupRequest, SignupResponse, UpdateRequest, UserPatch, UserSummary,
};
use crate::state::AppState;
use crate::utils::password::{dummy_hash, hash_password, verify_password};
use crate::utils::validation::{validate_signin, validate_signup, validate_update};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

/// Argon2 is deliberately slow, so it runs off the async workers.
async fn hash_off_thread(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Hashing error: {}", e)))
}

async fn verify_off_thread(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Verify task failed: {}", e)))
        .map(|res| {
            res.unwrap_or_else(|e| {
                tracing::warn!("Stored password hash is unreadable: {}", e);
                false
            })
        })
}

/// Registers a new account and logs it straight in.
///
/// Bad input and a taken username both answer with the same 411 so the
/// endpoint can't be used to enumerate accounts.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    // 1. Shape and bounds
    let Json(payload) = payload.map_err(|_| ApiError::InvalidInput(SIGNUP_REJECTED))?;
    if let Err(reason) = validate_signup(&payload) {
        tracing::debug!("Signup rejected: {}", reason);
        return Err(ApiError::InvalidInput(SIGNUP_REJECTED));
    }

    // 2. Fast path for the obvious duplicate. The store still has the final say below.
    if state.db.find_by_username(&payload.username).await?.is_some() {
        return Err(ApiError::DuplicateIdentity(SIGNUP_REJECTED));
    }

    // 3. Hash and insert
    let password_hash = hash_off_thread(payload.password).await?;
    let user = NewUser {
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
    };

    let created = match state.db.create(user).await {
        Ok(u) => u,
        Err(StoreError::DuplicateKey) => {
            return Err(ApiError::DuplicateIdentity(SIGNUP_REJECTED));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %created.id, "User created");

    // 4. Token
    let token = state.tokens.issue(&created.id)?;

    Ok(Json(SignupResponse {
        message: "User created successfully".to_string(),
        token,
    }))
}

/// Exchanges a username and password for a token.
///
/// Unknown username and wrong password look identical to the caller, in
/// body and in timing: an unknown username still pays for one argon2 verify.
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::InvalidInput(SIGNIN_REJECTED))?;
    if let Err(reason) = validate_signin(&payload) {
        tracing::debug!("Signin rejected: {}", reason);
        return Err(ApiError::InvalidInput(SIGNIN_REJECTED));
    }

    let Some(user) = state.db.find_by_username(&payload.username).await? else {
        verify_off_thread(payload.password, dummy_hash().to_string()).await?;
        return Err(ApiError::AuthenticationFailure(SIGNIN_REJECTED));
    };

    if !verify_off_thread(payload.password, user.password_hash).await? {
        return Err(ApiError::AuthenticationFailure(SIGNIN_REJECTED));
    }

    let token = state.tokens.issue(&user.id)?;
    tracing::info!(user_id = %user.id, "User signed in");

    Ok(Json(SigninResponse { token }))
}

/// Updates the caller's own profile. Only the fields sent are touched.
pub async fn update_profile(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::InvalidInput(UPDATE_REJECTED))?;
    if let Err(reason) = validate_update(&payload) {
        tracing::debug!("Update rejected: {}", reason);
        return Err(ApiError::InvalidInput(UPDATE_REJECTED));
    }

    let password_hash = match payload.password {
        Some(password) => Some(hash_off_thread(password).await?),
        None => None,
    };
    let patch = UserPatch {
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
    };

    state.db.update_by_id(&user.user_id, patch).await?;
    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(MessageResponse {
        message: "Updated successfully".to_string(),
    }))
}

/// Finds users by a case-insensitive substring of their first or last name.
///
/// A missing or empty `filter` returns everyone. No paging.
pub async fn bulk_search(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    query: Result<Query<BulkQuery>, QueryRejection>,
) -> Result<Json<BulkResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!("Search rejected: {}", e);
        ApiError::InvalidInput(SEARCH_REJECTED)
    })?;
    let users = state.db.search_by_name(&query.filter).await?;

    Ok(Json(BulkResponse {
        users: users.into_iter().map(UserSummary::from).collect(),
    }))
}
