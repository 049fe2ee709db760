//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_FULL_NAME_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH,
    MIN_USERNAME_LENGTH,
};
use crate::utils::{validate_not_blank, validate_username};

/// Create user request (administrative)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = MIN_USERNAME_LENGTH, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(email, length(max = 100))]
    pub email: String,

    #[validate(
        length(min = 1, max = MAX_FULL_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub full_name: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: String,

    /// Defaults to no role
    pub role_id: Option<i64>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(
        length(min = 1, max = MAX_FULL_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub full_name: Option<String>,

    /// Current password (required when changing one's own password)
    pub current_password: Option<String>,

    /// New password
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub new_password: Option<String>,

    pub role_id: Option<i64>,

    pub is_active: Option<bool>,
}

/// List users query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}
