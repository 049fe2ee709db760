//! Role request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_ROLE_NAME_LENGTH;
use crate::utils::validate_not_blank;

/// Create role request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(
        length(min = 1, max = MAX_ROLE_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Update role request; `permissions` replaces the full set when present
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(
        length(min = 1, max = MAX_ROLE_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    pub locked: Option<bool>,

    pub permissions: Option<Vec<String>>,
}
