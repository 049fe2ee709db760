//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Length of generated refresh tokens
pub const REFRESH_TOKEN_LENGTH: usize = 48;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 50;

/// Maximum full name length
pub const MAX_FULL_NAME_LENGTH: u64 = 100;

// =============================================================================
// TOURNAMENT SETTINGS
// =============================================================================

/// Days until a pending tournament invitation expires
pub const DEFAULT_INVITATION_EXPIRY_DAYS: i64 = 7;

/// Maximum tournament name length
pub const MAX_TOURNAMENT_NAME_LENGTH: u64 = 100;

/// Maximum tournament description length
pub const MAX_TOURNAMENT_DESCRIPTION_LENGTH: u64 = 10_000;

/// Maximum length of free-text match notes
pub const MAX_MATCH_NOTES_LENGTH: u64 = 2_000;

/// Maximum role name length
pub const MAX_ROLE_NAME_LENGTH: u64 = 64;

// =============================================================================
// ACCESS CONTROL
// =============================================================================

/// Built-in role names (seeded by migrations, locked)
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";

    /// Role assigned to self-registered accounts
    pub const DEFAULT: &str = USER;
}

/// Permission keys
///
/// Keys are opaque strings stored in the `permissions` table. Handlers pass
/// the keys they need to the authorization gate; the gate only checks set
/// membership.
pub mod permissions {
    pub const USERS_CAN_VIEW_USER_LIST: &str = "users_can_view_user_list";
    pub const USERS_CAN_CREATE_USER: &str = "users_can_create_user";
    pub const USERS_CAN_EDIT_OTHER_USERS: &str = "users_can_edit_other_users";

    pub const MATCHES_CAN_VIEW_ALL: &str = "matches_can_view_all";
    pub const MATCHES_CAN_CREATE: &str = "matches_can_create";
    pub const MATCHES_CAN_VERIFY: &str = "matches_can_verify";
    pub const MATCHES_CAN_EDIT_ALL: &str = "matches_can_edit_all";

    pub const TOURNAMENTS_CAN_VIEW_ALL: &str = "tournaments_can_view_all";
    pub const TOURNAMENTS_CAN_CREATE: &str = "tournaments_can_create";
    pub const TOURNAMENTS_CAN_EDIT_ALL: &str = "tournaments_can_edit_all";

    pub const ROLES_CAN_VIEW_ROLE_LIST: &str = "roles_can_view_role_list";
    pub const ROLES_CAN_CREATE_EDIT_ROLE: &str = "roles_can_create_edit_role";

    /// All known permission keys
    pub const ALL: &[&str] = &[
        USERS_CAN_VIEW_USER_LIST,
        USERS_CAN_CREATE_USER,
        USERS_CAN_EDIT_OTHER_USERS,
        MATCHES_CAN_VIEW_ALL,
        MATCHES_CAN_CREATE,
        MATCHES_CAN_VERIFY,
        MATCHES_CAN_EDIT_ALL,
        TOURNAMENTS_CAN_VIEW_ALL,
        TOURNAMENTS_CAN_CREATE,
        TOURNAMENTS_CAN_EDIT_ALL,
        ROLES_CAN_VIEW_ROLE_LIST,
        ROLES_CAN_CREATE_EDIT_ROLE,
    ];
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;
