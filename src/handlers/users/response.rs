//! User response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::User;

/// User representation returned by the API (never includes the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub role_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            role_id: user.role_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User list response
#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Generic confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
