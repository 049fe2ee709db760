//! Role and permission repository

use sqlx::{postgres::PgExecutor, PgPool};

use crate::{
    error::AppResult,
    models::{Permission, PermissionGroup, Role},
};

/// Repository for roles, permissions and their assignment
pub struct RoleRepository;

impl RoleRepository {
    /// Create a role without permissions
    pub async fn create<'e, E>(executor: E, name: &str, locked: bool) -> AppResult<Role>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name, locked)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(locked)
        .fetch_one(executor)
        .await?;

        Ok(role)
    }

    /// Find role by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(r#"SELECT * FROM roles WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(role)
    }

    /// Find role by name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(r#"SELECT * FROM roles WHERE name = $1"#)
            .bind(name)
            .fetch_optional(pool)
            .await?;

        Ok(role)
    }

    /// List all roles
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(r#"SELECT * FROM roles ORDER BY id"#)
            .fetch_all(pool)
            .await?;

        Ok(roles)
    }

    /// Update name and lock flag
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        name: Option<&str>,
        locked: Option<bool>,
    ) -> AppResult<Role>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = COALESCE($2, name), locked = COALESCE($3, locked)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(locked)
        .fetch_one(executor)
        .await?;

        Ok(role)
    }

    /// Delete role; returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM roles WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Permission keys granted to one role
    pub async fn permission_keys<'e, E>(executor: E, role_id: i64) -> AppResult<Vec<String>>
    where
        E: PgExecutor<'e>,
    {
        let keys = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.key
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.key
            "#,
        )
        .bind(role_id)
        .fetch_all(executor)
        .await?;

        Ok(keys)
    }

    /// (role_id, key) pairs for every role
    pub async fn all_permission_keys(pool: &PgPool) -> AppResult<Vec<(i64, String)>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT rp.role_id, p.key
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            ORDER BY rp.role_id, p.key
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Replace a role's permissions with `permission_ids`
    pub async fn set_permissions(
        conn: &mut sqlx::PgConnection,
        role_id: i64,
        permission_ids: &[i64],
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM role_permissions WHERE role_id = $1"#)
            .bind(role_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// All permissions
    pub async fn list_permissions(pool: &PgPool) -> AppResult<Vec<Permission>> {
        let permissions = sqlx::query_as::<_, Permission>(r#"SELECT * FROM permissions ORDER BY id"#)
            .fetch_all(pool)
            .await?;

        Ok(permissions)
    }

    /// Permissions matching any of `keys`
    pub async fn find_permissions_by_keys(
        pool: &PgPool,
        keys: &[String],
    ) -> AppResult<Vec<Permission>> {
        let permissions =
            sqlx::query_as::<_, Permission>(r#"SELECT * FROM permissions WHERE key = ANY($1)"#)
                .bind(keys)
                .fetch_all(pool)
                .await?;

        Ok(permissions)
    }

    /// All permission groups
    pub async fn list_groups(pool: &PgPool) -> AppResult<Vec<PermissionGroup>> {
        let groups =
            sqlx::query_as::<_, PermissionGroup>(r#"SELECT * FROM permission_groups ORDER BY id"#)
                .fetch_all(pool)
                .await?;

        Ok(groups)
    }
}
