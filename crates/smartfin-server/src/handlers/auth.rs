//! Account and session handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, SuccessResponse};
use smartfin_core::models::User;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub business_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session token plus the account it belongs to.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/signup - Create an account and log it in
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = state.db.create_user(
        &payload.email,
        &payload.password,
        payload.business_name.as_deref(),
    )?;
    let token = state.db.create_session(user.id)?;

    info!(user = %user.email, "Account created");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/login - Issue a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.db.authenticate(&payload.email, &payload.password)?;
    let token = state.db.create_session(user.id)?;

    info!(user = %user.email, "Logged in");
    Ok(Json(AuthResponse { token, user }))
}

/// POST /api/auth/logout - Revoke the presented session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    // the middleware already validated this token; re-read it so we revoke
    // exactly the session the request rode in on
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
    {
        state.db.delete_session(token.trim())?;
    }

    info!(user = %user.email, "Logged out");
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/auth/me - Current account
pub async fn get_me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
