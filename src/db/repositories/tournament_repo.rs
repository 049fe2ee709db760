//! Tournament repository

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgExecutor, PgPool};

use crate::{
    error::AppResult,
    models::{Tournament, TournamentParticipant, TournamentStatus},
};

/// Repository for tournaments and their participants
pub struct TournamentRepository;

impl TournamentRepository {
    /// Create a new tournament
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        status: TournamentStatus,
        created_by: i64,
    ) -> AppResult<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments (name, description, start_date, end_date, status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(status.as_str())
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Ok(tournament)
    }

    /// Find tournament by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> AppResult<Option<Tournament>>
    where
        E: PgExecutor<'e>,
    {
        let tournament =
            sqlx::query_as::<_, Tournament>(r#"SELECT * FROM tournaments WHERE id = $1"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(tournament)
    }

    /// Find tournament by ID and lock the row until the transaction ends
    pub async fn find_by_id_for_update<'e, E>(
        executor: E,
        id: i64,
    ) -> AppResult<Option<Tournament>>
    where
        E: PgExecutor<'e>,
    {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"SELECT * FROM tournaments WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(tournament)
    }

    /// List tournaments with pagination
    pub async fn list(
        pool: &PgPool,
        active_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Tournament>, i64)> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT * FROM tournaments
            WHERE (NOT $1 OR is_active)
            ORDER BY start_date DESC, id DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(active_only)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM tournaments WHERE (NOT $1 OR is_active)"#)
                .bind(active_only)
                .fetch_one(pool)
                .await?;

        Ok((tournaments, count))
    }

    /// Update descriptive fields
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(pool)
        .await?;

        Ok(tournament)
    }

    /// Move the tournament to `status`
    pub async fn set_status<'e, E>(
        executor: E,
        id: i64,
        status: TournamentStatus,
    ) -> AppResult<Tournament>
    where
        E: PgExecutor<'e>,
    {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"UPDATE tournaments SET status = $2 WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(executor)
        .await?;

        Ok(tournament)
    }

    /// Toggle listing visibility
    pub async fn set_visibility(pool: &PgPool, id: i64, is_active: bool) -> AppResult<Tournament> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"UPDATE tournaments SET is_active = $2 WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok(tournament)
    }

    /// Enroll a user; re-enrolling reactivates a removed participant
    pub async fn add_participant<'e, E>(
        executor: E,
        tournament_id: i64,
        user_id: i64,
    ) -> AppResult<TournamentParticipant>
    where
        E: PgExecutor<'e>,
    {
        let participant = sqlx::query_as::<_, TournamentParticipant>(
            r#"
            INSERT INTO tournament_participants (tournament_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (tournament_id, user_id)
            DO UPDATE SET is_active = TRUE, joined_at = NOW()
            RETURNING *
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(participant)
    }

    /// Check whether a user is an active participant
    pub async fn is_active_participant<'e, E>(
        executor: E,
        tournament_id: i64,
        user_id: i64,
    ) -> AppResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM tournament_participants
                WHERE tournament_id = $1 AND user_id = $2 AND is_active
            )
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Active participants in join order
    pub async fn list_participants(
        pool: &PgPool,
        tournament_id: i64,
    ) -> AppResult<Vec<TournamentParticipant>> {
        let participants = sqlx::query_as::<_, TournamentParticipant>(
            r#"
            SELECT * FROM tournament_participants
            WHERE tournament_id = $1 AND is_active
            ORDER BY joined_at, id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(pool)
        .await?;

        Ok(participants)
    }

    /// Number of active participants
    pub async fn count_participants<'e, E>(executor: E, tournament_id: i64) -> AppResult<i64>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tournament_participants
            WHERE tournament_id = $1 AND is_active
            "#,
        )
        .bind(tournament_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Soft-delete a participant; returns whether an active row was found
    pub async fn deactivate_participant(
        pool: &PgPool,
        tournament_id: i64,
        user_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tournament_participants
            SET is_active = FALSE
            WHERE tournament_id = $1 AND user_id = $2 AND is_active
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
