use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Simple health check endpoint.
///
/// Pings the identity store as well. The process being up isn't worth much
/// if nobody can sign in.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.db.ping().await {
        Ok(()) => "Connected",
        Err(e) => {
            tracing::warn!("Health check could not reach the store: {}", e);
            "Disconnected"
        }
    };

    let response = HealthResponse {
        status: "Accounts service is healthy".to_string(),
        database: db_status.to_string(),
    };

    (StatusCode::OK, Json(response))
}
