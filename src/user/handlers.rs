use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::identity::UserIdentity;
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub token: String,
    pub username: String,
    pub display_name: String,
}

/// HTTP handler for registering a player identity
///
/// POST /register
/// Returns the bearer token used on all room endpoints
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::BadRequest("username must not be empty".into()));
    }
    let display_name = request
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    let token = state
        .identity
        .register(username.clone(), display_name.clone())
        .await;

    info!(username = %username, "Player registered via API");

    Ok(Json(RegisterResponse {
        token,
        username,
        display_name,
    }))
}

/// Resolves the caller's bearer token into an identity
///
/// Room endpoints all authenticate through this; a missing or unknown
/// token is rejected before any room state is touched.
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserIdentity, AppError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    state
        .identity
        .resolve(token)
        .await
        .ok_or_else(|| AppError::Unauthorized("unknown token".to_string()))
}
