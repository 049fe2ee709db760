//! User handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    constants::{permissions, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{AuthorizationService, UserService, UserUpdate},
    state::AppState,
};

use super::{
    request::{CreateUserRequest, ListUsersQuery, UpdateUserRequest},
    response::{MessageResponse, UserResponse, UsersListResponse},
};

/// List all users (paginated)
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<UsersListResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::USERS_CAN_VIEW_USER_LIST],
    )
    .await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let (users, total) =
        UserService::list_users(state.db(), page, per_page, query.search.as_deref()).await?;

    Ok(Json(UsersListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Create a user account
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let actor = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::USERS_CAN_CREATE_USER],
    )
    .await?;

    payload.validate()?;

    let user = UserService::create_user(
        state.db(),
        &actor,
        &payload.username,
        &payload.email,
        payload.full_name.trim(),
        &payload.password,
        payload.role_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a specific user by ID
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let actor = AuthorizationService::authorize_request(state.db(), &auth_user, &[]).await?;

    let user = UserService::get_user(state.db(), &actor, id).await?;

    Ok(Json(user.into()))
}

/// Update user profile
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let actor = AuthorizationService::authorize_request(state.db(), &auth_user, &[]).await?;

    payload.validate()?;

    let update = UserUpdate {
        email: payload.email.as_deref(),
        full_name: payload.full_name.as_deref().map(str::trim),
        current_password: payload.current_password.as_deref(),
        new_password: payload.new_password.as_deref(),
        role_id: payload.role_id,
        is_active: payload.is_active,
    };

    let user = UserService::update_user(state.db(), &actor, id, update).await?;

    Ok(Json(user.into()))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let actor = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::USERS_CAN_EDIT_OTHER_USERS],
    )
    .await?;

    UserService::delete_user(state.db(), &actor, id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
