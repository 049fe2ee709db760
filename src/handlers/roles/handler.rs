//! Role handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    constants::permissions,
    error::AppResult,
    handlers::users::MessageResponse,
    middleware::auth::AuthenticatedUser,
    services::{AuthorizationService, RoleService},
    state::AppState,
};

use super::{
    request::{CreateRoleRequest, UpdateRoleRequest},
    response::{
        PermissionGroupsListResponse, PermissionsListResponse, RoleResponse, RolesListResponse,
    },
};

/// List roles with their permissions
pub async fn list_roles(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<RolesListResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::ROLES_CAN_VIEW_ROLE_LIST],
    )
    .await?;

    let roles = RoleService::list_roles(state.db()).await?;

    Ok(Json(RolesListResponse {
        roles: roles.into_iter().map(RoleResponse::from).collect(),
    }))
}

/// Get a role
pub async fn get_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::ROLES_CAN_VIEW_ROLE_LIST],
    )
    .await?;

    let role = RoleService::get_role(state.db(), id).await?;

    Ok(Json(role.into()))
}

/// Create a role
pub async fn create_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::ROLES_CAN_CREATE_EDIT_ROLE],
    )
    .await?;

    payload.validate()?;

    let role = RoleService::create_role(
        state.db(),
        payload.name.trim(),
        payload.locked,
        &payload.permissions,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(role.into())))
}

/// Update a role
pub async fn update_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<RoleResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::ROLES_CAN_CREATE_EDIT_ROLE],
    )
    .await?;

    payload.validate()?;

    let role = RoleService::update_role(
        state.db(),
        id,
        payload.name.as_deref().map(str::trim),
        payload.locked,
        payload.permissions.as_deref(),
    )
    .await?;

    Ok(Json(role.into()))
}

/// Delete an unlocked role
pub async fn delete_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::ROLES_CAN_CREATE_EDIT_ROLE],
    )
    .await?;

    RoleService::delete_role(state.db(), id).await?;

    Ok(Json(MessageResponse {
        message: "Role deleted successfully".to_string(),
    }))
}

/// List every permission
pub async fn list_permissions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<PermissionsListResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::USERS_CAN_VIEW_USER_LIST],
    )
    .await?;

    let permissions = RoleService::list_permissions(state.db()).await?;

    Ok(Json(PermissionsListResponse { permissions }))
}

/// List permission groups
pub async fn list_permission_groups(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<PermissionGroupsListResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::USERS_CAN_VIEW_USER_LIST],
    )
    .await?;

    let groups = RoleService::list_permission_groups(state.db()).await?;

    Ok(Json(PermissionGroupsListResponse { groups }))
}
