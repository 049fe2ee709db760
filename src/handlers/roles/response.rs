//! Role response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Permission, PermissionGroup};
use crate::services::RoleWithPermissions;

/// Role with its permission keys
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub locked: bool,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RoleWithPermissions> for RoleResponse {
    fn from(value: RoleWithPermissions) -> Self {
        Self {
            id: value.role.id,
            name: value.role.name,
            locked: value.role.locked,
            permissions: value.permissions,
            created_at: value.role.created_at,
        }
    }
}

/// Role list response
#[derive(Debug, Serialize)]
pub struct RolesListResponse {
    pub roles: Vec<RoleResponse>,
}

/// Permission list response
#[derive(Debug, Serialize)]
pub struct PermissionsListResponse {
    pub permissions: Vec<Permission>,
}

/// Permission group list response
#[derive(Debug, Serialize)]
pub struct PermissionGroupsListResponse {
    pub groups: Vec<PermissionGroup>,
}
