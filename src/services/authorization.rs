//! Authorization gate
//!
//! Every protected operation names the permission keys it requires. The gate
//! resolves the acting user's role through a [`PermissionStore`] and checks
//! set membership; nothing is cached between checks.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::{
    db::repositories::{RoleRepository, UserRepository},
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::User,
};

/// Source of role -> permission key mappings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Union of the permission keys granted to a role
    async fn permissions_for_role(&self, role_id: i64) -> AppResult<HashSet<String>>;
}

/// PostgreSQL-backed permission store
#[derive(Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn permissions_for_role(&self, role_id: i64) -> AppResult<HashSet<String>> {
        let keys = RoleRepository::permission_keys(&self.pool, role_id).await?;
        Ok(keys.into_iter().collect())
    }
}

/// Authorization service
pub struct AuthorizationService;

impl AuthorizationService {
    /// Check that `user` is present, active and holds every `required` key
    pub async fn authorize(
        store: &dyn PermissionStore,
        user: Option<&User>,
        required: &[&str],
    ) -> AppResult<()> {
        let user = user.ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Forbidden("inactive".to_string()));
        }

        let granted = match user.role_id {
            Some(role_id) => store.permissions_for_role(role_id).await?,
            None => HashSet::new(),
        };

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| !granted.contains(*key))
            .collect();

        if !missing.is_empty() {
            debug!(user_id = user.id, missing = ?missing, "Permission check failed");
            return Err(AppError::Forbidden("missing permissions".to_string()));
        }

        Ok(())
    }

    /// Resolve the request's user from the database and authorize them.
    ///
    /// Returns the loaded user so callers do not fetch it twice.
    pub async fn authorize_request(
        pool: &PgPool,
        auth_user: &AuthenticatedUser,
        required: &[&str],
    ) -> AppResult<User> {
        let user = UserRepository::find_by_id(pool, auth_user.id).await?;
        let store = PgPermissionStore::new(pool.clone());

        Self::authorize(&store, user.as_ref(), required).await?;

        // authorize() rejects a missing user
        user.ok_or(AppError::Unauthorized)
    }

    /// Whether the user holds `key`, without failing the request
    pub async fn has_permission(pool: &PgPool, user: &User, key: &str) -> AppResult<bool> {
        let store = PgPermissionStore::new(pool.clone());
        match Self::authorize(&store, Some(user), &[key]).await {
            Ok(()) => Ok(true),
            Err(AppError::Forbidden(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::permissions;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn user(role_id: Option<i64>, is_active: bool) -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice".to_string(),
            password_hash: String::new(),
            is_active,
            role_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn store_granting(role_id: i64, keys: &'static [&'static str]) -> MockPermissionStore {
        let mut store = MockPermissionStore::new();
        store
            .expect_permissions_for_role()
            .with(eq(role_id))
            .returning(move |_| Ok(keys.iter().map(|k| k.to_string()).collect()));
        store
    }

    #[tokio::test]
    async fn test_granted_permission_passes() {
        let store = store_granting(2, &[permissions::MATCHES_CAN_VERIFY]);
        let result = AuthorizationService::authorize(
            &store,
            Some(&user(Some(2), true)),
            &[permissions::MATCHES_CAN_VERIFY],
        )
        .await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_empty_requirement_only_checks_account() {
        let store = store_granting(2, &[]);
        tokio_test::assert_ok!(
            AuthorizationService::authorize(&store, Some(&user(Some(2), true)), &[]).await
        );
        tokio_test::assert_err!(
            AuthorizationService::authorize(&store, Some(&user(Some(2), false)), &[]).await
        );
    }

    #[tokio::test]
    async fn test_missing_permission_is_forbidden() {
        let store = store_granting(2, &[permissions::MATCHES_CAN_CREATE]);
        let result = AuthorizationService::authorize(
            &store,
            Some(&user(Some(2), true)),
            &[permissions::MATCHES_CAN_VERIFY],
        )
        .await;
        match result {
            Err(AppError::Forbidden(reason)) => assert_eq!(reason, "missing permissions"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_all_required_keys_must_be_present() {
        let store = store_granting(2, &[permissions::MATCHES_CAN_VERIFY]);
        let result = AuthorizationService::authorize(
            &store,
            Some(&user(Some(2), true)),
            &[permissions::MATCHES_CAN_VERIFY, permissions::MATCHES_CAN_EDIT_ALL],
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_inactive_user_is_forbidden() {
        let store = MockPermissionStore::new();
        let result = AuthorizationService::authorize(
            &store,
            Some(&user(Some(2), false)),
            &[permissions::MATCHES_CAN_VERIFY],
        )
        .await;
        match result {
            Err(AppError::Forbidden(reason)) => assert_eq!(reason, "inactive"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let store = MockPermissionStore::new();
        let result =
            AuthorizationService::authorize(&store, None, &[permissions::MATCHES_CAN_VERIFY]).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_user_without_role_has_no_permissions() {
        let store = MockPermissionStore::new();
        let result = AuthorizationService::authorize(
            &store,
            Some(&user(None, true)),
            &[permissions::MATCHES_CAN_CREATE],
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        // Nothing required, nothing to check
        let result = AuthorizationService::authorize(&store, Some(&user(None, true)), &[]).await;
        assert!(result.is_ok());
    }
}
