//! Match repository

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgExecutor, PgPool};

use crate::{
    error::AppResult,
    models::{Match, MatchStatus, MatchType},
};

/// Values for a freshly submitted match
#[derive(Debug)]
pub struct NewMatch<'a> {
    pub player1_id: i64,
    pub player2_id: i64,
    pub player1_score: i32,
    pub player2_score: i32,
    pub match_type: MatchType,
    pub submitted_by_id: i64,
    pub tournament_id: Option<i64>,
    pub notes: Option<&'a str>,
    pub match_date: Option<DateTime<Utc>>,
}

/// Optional listing filters
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchFilter {
    pub match_type: Option<MatchType>,
    pub status: Option<MatchStatus>,
    pub tournament_id: Option<i64>,
}

/// Repository for match database operations
pub struct MatchRepository;

impl MatchRepository {
    /// Insert a match with empty verification slots
    pub async fn create<'e, E>(executor: E, new: &NewMatch<'_>) -> AppResult<Match>
    where
        E: PgExecutor<'e>,
    {
        let m = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (
                player1_id, player2_id, player1_score, player2_score,
                match_type, status, submitted_by_id, tournament_id, notes, match_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, NOW()))
            RETURNING *
            "#,
        )
        .bind(new.player1_id)
        .bind(new.player2_id)
        .bind(new.player1_score)
        .bind(new.player2_score)
        .bind(new.match_type.as_str())
        .bind(MatchStatus::PendingVerification.as_str())
        .bind(new.submitted_by_id)
        .bind(new.tournament_id)
        .bind(new.notes)
        .bind(new.match_date)
        .fetch_one(executor)
        .await?;

        Ok(m)
    }

    /// Find match by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> AppResult<Option<Match>>
    where
        E: PgExecutor<'e>,
    {
        let m = sqlx::query_as::<_, Match>(r#"SELECT * FROM matches WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(m)
    }

    /// Find match by ID and lock the row until the transaction ends
    pub async fn find_by_id_for_update<'e, E>(executor: E, id: i64) -> AppResult<Option<Match>>
    where
        E: PgExecutor<'e>,
    {
        let m = sqlx::query_as::<_, Match>(r#"SELECT * FROM matches WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(m)
    }

    /// Persist the lifecycle columns of `m`
    pub async fn save_state<'e, E>(executor: E, m: &Match) -> AppResult<Match>
    where
        E: PgExecutor<'e>,
    {
        let saved = sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches
            SET
                status = $2,
                verified_by_id = $3,
                notes = $4,
                player1_verified = $5,
                player1_verified_by = $6,
                player2_verified = $7,
                player2_verified_by = $8,
                verified_at = $9,
                rejected_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(m.id)
        .bind(m.status.as_str())
        .bind(m.verified_by_id)
        .bind(&m.notes)
        .bind(m.player1_verified)
        .bind(m.player1_verified_by)
        .bind(m.player2_verified)
        .bind(m.player2_verified_by)
        .bind(m.verified_at)
        .bind(m.rejected_at)
        .fetch_one(executor)
        .await?;

        Ok(saved)
    }

    /// List matches with pagination, newest first
    pub async fn list(
        pool: &PgPool,
        filter: MatchFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Match>, i64)> {
        let match_type = filter.match_type.map(|t| t.as_str());
        let status = filter.status.map(|s| s.as_str());

        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT * FROM matches
            WHERE
                ($1::text IS NULL OR match_type = $1)
                AND ($2::text IS NULL OR status = $2)
                AND ($3::bigint IS NULL OR tournament_id = $3)
            ORDER BY match_date DESC, id DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(match_type)
        .bind(status)
        .bind(filter.tournament_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM matches
            WHERE
                ($1::text IS NULL OR match_type = $1)
                AND ($2::text IS NULL OR status = $2)
                AND ($3::bigint IS NULL OR tournament_id = $3)
            "#,
        )
        .bind(match_type)
        .bind(status)
        .bind(filter.tournament_id)
        .fetch_one(pool)
        .await?;

        Ok((matches, count))
    }

    /// Pending matches in which `user_id` plays
    pub async fn list_pending_involving(pool: &PgPool, user_id: i64) -> AppResult<Vec<Match>> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT * FROM matches
            WHERE status = $1 AND (player1_id = $2 OR player2_id = $2)
            ORDER BY match_date DESC, id DESC
            "#,
        )
        .bind(MatchStatus::PendingVerification.as_str())
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(matches)
    }

    /// Verified matches of a tournament
    pub async fn list_verified_for_tournament(
        pool: &PgPool,
        tournament_id: i64,
    ) -> AppResult<Vec<Match>> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT * FROM matches
            WHERE tournament_id = $1 AND status = $2
            ORDER BY id
            "#,
        )
        .bind(tournament_id)
        .bind(MatchStatus::Verified.as_str())
        .fetch_all(pool)
        .await?;

        Ok(matches)
    }

    /// Number of matches a user played, submitted or verified
    pub async fn count_referencing_user(pool: &PgPool, user_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM matches
            WHERE $1 IN (
                player1_id, player2_id, submitted_by_id,
                COALESCE(verified_by_id, 0),
                COALESCE(player1_verified_by, 0),
                COALESCE(player2_verified_by, 0)
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
