//! User repository

use sqlx::{postgres::PgExecutor, PgPool};

use crate::{error::AppResult, models::User};

/// Fields an update may change; `None` keeps the current value
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role_id: Option<i64>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name, password_hash, role_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> AppResult<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    /// Find several users at once; missing ids are skipped
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = ANY($1)"#)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(users)
    }

    /// Find user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE username = $1"#)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by username or email (for login)
    pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE username = $1 OR email = $1"#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Update user
    pub async fn update(pool: &PgPool, id: i64, changes: &UserChanges<'_>) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                password_hash = COALESCE($4, password_hash),
                role_id = COALESCE($5, role_id),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.full_name)
        .bind(changes.password_hash)
        .bind(changes.role_id)
        .bind(changes.is_active)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> AppResult<(Vec<User>, i64)> {
        let search_pattern = search.map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1 OR full_name ILIKE $1)
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(&search_pattern)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1 OR full_name ILIKE $1)
            "#,
        )
        .bind(&search_pattern)
        .fetch_one(pool)
        .await?;

        Ok((users, count))
    }

    /// Delete user; returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
