//! User service

use sqlx::PgPool;
use tracing::info;

use crate::{
    constants::permissions,
    db::repositories::{MatchRepository, RoleRepository, UserChanges, UserRepository},
    error::{AppError, AppResult},
    models::User,
    services::{AuthService, AuthorizationService},
    utils::page_offset,
};

/// Profile changes requested through the API
#[derive(Debug, Default)]
pub struct UserUpdate<'a> {
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub current_password: Option<&'a str>,
    pub new_password: Option<&'a str>,
    pub role_id: Option<i64>,
    pub is_active: Option<bool>,
}

impl UserUpdate<'_> {
    fn touches_administrative_fields(&self) -> bool {
        self.role_id.is_some() || self.is_active.is_some()
    }
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: i64) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get a user's profile; other users' profiles need the user-list permission
    pub async fn get_user(pool: &PgPool, actor: &User, id: i64) -> AppResult<User> {
        if actor.id != id
            && !AuthorizationService::has_permission(pool, actor, permissions::USERS_CAN_VIEW_USER_LIST)
                .await?
        {
            return Err(AppError::Forbidden("missing permissions".to_string()));
        }

        Self::get_user_by_id(pool, id).await
    }

    /// List users with pagination
    pub async fn list_users(
        pool: &PgPool,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> AppResult<(Vec<User>, i64)> {
        let offset = page_offset(page, per_page);
        let limit = i64::from(per_page);

        UserRepository::list(pool, offset, limit, search).await
    }

    /// Create an account on behalf of an administrator
    pub async fn create_user(
        pool: &PgPool,
        actor: &User,
        username: &str,
        email: &str,
        full_name: &str,
        password: &str,
        role_id: Option<i64>,
    ) -> AppResult<User> {
        if let Some(role_id) = role_id {
            Self::ensure_role_exists(pool, role_id).await?;
        }

        let user =
            AuthService::create_account(pool, username, email, full_name, password, role_id).await?;

        info!(user_id = user.id, created_by = actor.id, "User created");
        Ok(user)
    }

    /// Update a profile.
    ///
    /// Users may edit their own email, name and password. Editing another
    /// account, or changing role or active flag, needs the edit-others permission.
    pub async fn update_user(
        pool: &PgPool,
        actor: &User,
        target_id: i64,
        update: UserUpdate<'_>,
    ) -> AppResult<User> {
        if actor.id != target_id || update.touches_administrative_fields() {
            let allowed = AuthorizationService::has_permission(
                pool,
                actor,
                permissions::USERS_CAN_EDIT_OTHER_USERS,
            )
            .await?;
            if !allowed {
                return Err(AppError::Forbidden("missing permissions".to_string()));
            }
        }

        let target = Self::get_user_by_id(pool, target_id).await?;

        if let Some(email) = update.email {
            if email != target.email && UserRepository::find_by_email(pool, email).await?.is_some() {
                return Err(AppError::AlreadyExists("Email already registered".to_string()));
            }
        }

        if let Some(role_id) = update.role_id {
            Self::ensure_role_exists(pool, role_id).await?;
        }

        let password_hash = match update.new_password {
            Some(new_password) => {
                // Changing one's own password requires the current one
                if actor.id == target_id {
                    let current = update.current_password.ok_or_else(|| {
                        AppError::Validation("Current password required".to_string())
                    })?;
                    if !AuthService::verify_password(current, &target.password_hash)? {
                        return Err(AppError::InvalidCredentials);
                    }
                }
                Some(AuthService::hash_password(new_password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            email: update.email,
            full_name: update.full_name,
            password_hash: password_hash.as_deref(),
            role_id: update.role_id,
            is_active: update.is_active,
        };

        let user = UserRepository::update(pool, target_id, &changes).await?;
        info!(user_id = user.id, updated_by = actor.id, "User updated");
        Ok(user)
    }

    /// Delete an account that has no recorded matches
    pub async fn delete_user(pool: &PgPool, actor: &User, target_id: i64) -> AppResult<()> {
        if actor.id == target_id {
            return Err(AppError::Conflict("Cannot delete your own account".to_string()));
        }

        if MatchRepository::count_referencing_user(pool, target_id).await? > 0 {
            return Err(AppError::Conflict(
                "User has recorded matches; deactivate the account instead".to_string(),
            ));
        }

        if !UserRepository::delete(pool, target_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!(user_id = target_id, deleted_by = actor.id, "User deleted");
        Ok(())
    }

    async fn ensure_role_exists(pool: &PgPool, role_id: i64) -> AppResult<()> {
        RoleRepository::find_by_id(pool, role_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::Validation(format!("Role {role_id} does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrative_fields() {
        assert!(!UserUpdate {
            full_name: Some("New Name"),
            ..Default::default()
        }
        .touches_administrative_fields());

        assert!(UserUpdate {
            is_active: Some(false),
            ..Default::default()
        }
        .touches_administrative_fields());

        assert!(UserUpdate {
            role_id: Some(1),
            ..Default::default()
        }
        .touches_administrative_fields());
    }
}
