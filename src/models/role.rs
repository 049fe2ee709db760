//! Role and permission models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    /// Locked roles cannot be deleted
    pub locked: bool,
    pub created_at: DateTime<Utc>,
}

/// A single grantable capability
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub key: String,
    pub group_id: Option<i64>,
}

/// Display grouping for permissions
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub id: i64,
    pub name: String,
}
