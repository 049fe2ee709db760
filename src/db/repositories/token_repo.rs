//! Refresh token repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{error::AppResult, models::RefreshToken};

/// Repository for refresh token persistence
pub struct TokenRepository;

impl TokenRepository {
    /// Store the hash of a newly issued token
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(token)
    }

    /// Remove a token by hash and return it; a token can be consumed once
    pub async fn take_by_hash(pool: &PgPool, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"DELETE FROM refresh_tokens WHERE token_hash = $1 RETURNING *"#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(token)
    }

    /// Revoke one token of a user; returns whether it existed
    pub async fn delete_owned(pool: &PgPool, user_id: i64, token_hash: &str) -> AppResult<bool> {
        let result =
            sqlx::query(r#"DELETE FROM refresh_tokens WHERE token_hash = $1 AND user_id = $2"#)
                .bind(token_hash)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke every token of a user
    pub async fn delete_for_user(pool: &PgPool, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query(r#"DELETE FROM refresh_tokens WHERE user_id = $1"#)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Drop a user's tokens that expired before `now`
    pub async fn delete_expired_for_user(
        pool: &PgPool,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result =
            sqlx::query(r#"DELETE FROM refresh_tokens WHERE user_id = $1 AND expires_at < $2"#)
                .bind(user_id)
                .bind(now)
                .execute(pool)
                .await?;

        Ok(result.rows_affected())
    }
}
