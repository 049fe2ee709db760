//! Authentication handler implementations

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::{AuthService, RoleService, UserService},
    state::AppState,
};

use super::{
    request::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest},
    response::{AuthResponse, CurrentUserResponse, LogoutResponse, RegisterResponse},
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.validate()?;

    let user = AuthService::register(
        state.db(),
        &payload.username,
        &payload.email,
        payload.full_name.trim(),
        &payload.password,
    )
    .await?;

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username/email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (user, tokens) = AuthService::login(
        state.db(),
        state.config(),
        &payload.identifier,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse::new(tokens, user.into())))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<AuthResponse>> {
    if payload.refresh_token.is_empty() {
        return Err(AppError::InvalidToken);
    }

    let (user, tokens) =
        AuthService::refresh_token(state.db(), state.config(), &payload.refresh_token).await?;

    Ok(Json(AuthResponse::new(tokens, user.into())))
}

/// Logout (revoke refresh tokens)
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    payload: Option<Json<LogoutRequest>>,
) -> AppResult<Json<LogoutResponse>> {
    let Json(payload) = payload.unwrap_or_default();

    AuthService::logout(
        state.db(),
        auth_user.id,
        payload.refresh_token.as_deref(),
        payload.all_sessions.unwrap_or(false),
    )
    .await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Get current authenticated user with their effective permissions
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let user = UserService::get_user_by_id(state.db(), auth_user.id).await?;

    let permissions = match user.role_id {
        Some(role_id) => RoleService::get_role(state.db(), role_id).await?.permissions,
        None => Vec::new(),
    };

    Ok(Json(CurrentUserResponse {
        user: user.into(),
        permissions,
    }))
}
