//! Role administration service

use std::collections::{BTreeSet, HashMap};

use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::RoleRepository,
    error::{AppError, AppResult},
    models::{Permission, PermissionGroup, Role},
};

/// A role together with the keys it grants
#[derive(Debug, Clone)]
pub struct RoleWithPermissions {
    pub role: Role,
    pub permissions: Vec<String>,
}

/// Role service
pub struct RoleService;

impl RoleService {
    /// List roles with their permission keys
    pub async fn list_roles(pool: &PgPool) -> AppResult<Vec<RoleWithPermissions>> {
        let (roles, pairs) = futures::try_join!(
            RoleRepository::list(pool),
            RoleRepository::all_permission_keys(pool)
        )?;

        let mut keys_by_role: HashMap<i64, Vec<String>> = HashMap::new();
        for (role_id, key) in pairs {
            keys_by_role.entry(role_id).or_default().push(key);
        }

        Ok(roles
            .into_iter()
            .map(|role| RoleWithPermissions {
                permissions: keys_by_role.remove(&role.id).unwrap_or_default(),
                role,
            })
            .collect())
    }

    /// Get one role with its permission keys
    pub async fn get_role(pool: &PgPool, id: i64) -> AppResult<RoleWithPermissions> {
        let role = RoleRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_string()))?;
        let permissions = RoleRepository::permission_keys(pool, id).await?;

        Ok(RoleWithPermissions { role, permissions })
    }

    /// Create a role granting `permission_keys`
    pub async fn create_role(
        pool: &PgPool,
        name: &str,
        locked: bool,
        permission_keys: &[String],
    ) -> AppResult<RoleWithPermissions> {
        if RoleRepository::find_by_name(pool, name).await?.is_some() {
            return Err(AppError::AlreadyExists(format!("Role '{name}' already exists")));
        }

        let permission_ids = Self::resolve_permission_ids(pool, permission_keys).await?;

        let mut tx = pool.begin().await?;
        let role = RoleRepository::create(&mut *tx, name, locked).await?;
        RoleRepository::set_permissions(&mut tx, role.id, &permission_ids).await?;
        tx.commit().await?;

        info!(role_id = role.id, name = %role.name, "Role created");
        Self::get_role(pool, role.id).await
    }

    /// Update name, lock flag and (when given) the full permission set
    pub async fn update_role(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        locked: Option<bool>,
        permission_keys: Option<&[String]>,
    ) -> AppResult<RoleWithPermissions> {
        let existing = RoleRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_string()))?;

        if let Some(name) = name {
            if name != existing.name && RoleRepository::find_by_name(pool, name).await?.is_some() {
                return Err(AppError::AlreadyExists(format!("Role '{name}' already exists")));
            }
        }

        let permission_ids = match permission_keys {
            Some(keys) => Some(Self::resolve_permission_ids(pool, keys).await?),
            None => None,
        };

        let mut tx = pool.begin().await?;
        RoleRepository::update(&mut *tx, id, name, locked).await?;
        if let Some(permission_ids) = permission_ids {
            RoleRepository::set_permissions(&mut tx, id, &permission_ids).await?;
        }
        tx.commit().await?;

        info!(role_id = id, "Role updated");
        Self::get_role(pool, id).await
    }

    /// Delete an unlocked role
    pub async fn delete_role(pool: &PgPool, id: i64) -> AppResult<()> {
        let role = RoleRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_string()))?;

        if role.locked {
            return Err(AppError::Conflict(format!("Role '{}' is locked", role.name)));
        }

        RoleRepository::delete(pool, id).await?;
        info!(role_id = id, name = %role.name, "Role deleted");
        Ok(())
    }

    /// All permissions
    pub async fn list_permissions(pool: &PgPool) -> AppResult<Vec<Permission>> {
        RoleRepository::list_permissions(pool).await
    }

    /// All permission groups
    pub async fn list_permission_groups(pool: &PgPool) -> AppResult<Vec<PermissionGroup>> {
        RoleRepository::list_groups(pool).await
    }

    /// Map keys to permission ids; any unknown key is a validation error
    async fn resolve_permission_ids(pool: &PgPool, keys: &[String]) -> AppResult<Vec<i64>> {
        let requested: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
        let requested: Vec<String> = requested.into_iter().map(str::to_string).collect();

        let found = RoleRepository::find_permissions_by_keys(pool, &requested).await?;
        let unknown = unknown_keys(&requested, &found);
        if !unknown.is_empty() {
            return Err(AppError::Validation(format!(
                "Unknown permission keys: {}",
                unknown.join(", ")
            )));
        }

        Ok(found.into_iter().map(|permission| permission.id).collect())
    }
}

fn unknown_keys<'a>(requested: &'a [String], found: &[Permission]) -> Vec<&'a str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|key| !found.iter().any(|permission| permission.key == *key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permission(id: i64, key: &str) -> Permission {
        Permission {
            id,
            key: key.to_string(),
            group_id: None,
        }
    }

    #[test]
    fn test_unknown_keys() {
        let requested = vec![
            "matches_can_create".to_string(),
            "matches_can_fly".to_string(),
        ];
        let found = vec![permission(5, "matches_can_create")];

        assert_eq!(unknown_keys(&requested, &found), vec!["matches_can_fly"]);
        assert!(unknown_keys(&requested[..1], &found).is_empty());
    }
}
