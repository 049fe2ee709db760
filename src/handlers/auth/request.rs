//! Authentication request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_FULL_NAME_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH,
    MIN_USERNAME_LENGTH,
};
use crate::utils::{validate_not_blank, validate_username};

/// User registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
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
}

/// User login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Can be either username or email
    #[validate(length(min = 1))]
    pub identifier: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke
    pub refresh_token: Option<String>,

    /// Revoke every session of the user
    pub all_sessions: Option<bool>,
}
