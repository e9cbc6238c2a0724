use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/auth/login — exchange the configured admin credentials for a
/// bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".into()));
    }

    let (Some(signer), Some(password)) = (state.tokens.as_ref(), state.config.admin_password.as_deref())
    else {
        return Err(AppError::BadRequest("login is not configured".into()));
    };

    let username_ok = signer
        .credential_matches(&body.username, &state.config.admin_username)
        .map_err(|e| AppError::Internal(e.into()))?;
    let password_ok = signer
        .credential_matches(&body.password, password)
        .map_err(|e| AppError::Internal(e.into()))?;
    if !(username_ok && password_ok) {
        tracing::warn!(username = %body.username, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    let now = Utc::now();
    let token = signer
        .issue(&body.username, now)
        .map_err(|e| AppError::Internal(e.into()))?;
    let claims = signer
        .verify(&token, now)
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(username = %claims.username, "Issued access token");

    Ok(Json(ApiResponse::ok(LoginResponse {
        token,
        username: claims.username,
        expires_at: claims.expires_at,
    })))
}
