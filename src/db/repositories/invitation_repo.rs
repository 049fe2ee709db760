//! Tournament invitation repository

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgExecutor, PgPool};

use crate::{
    error::AppResult,
    models::{InvitationStatus, TournamentInvitation},
};

/// Repository for tournament invitations
pub struct InvitationRepository;

impl InvitationRepository {
    /// Create a pending invitation
    pub async fn create<'e, E>(
        executor: E,
        tournament_id: i64,
        user_id: i64,
        invited_by: i64,
        expires_at: DateTime<Utc>,
    ) -> AppResult<TournamentInvitation>
    where
        E: PgExecutor<'e>,
    {
        let invitation = sqlx::query_as::<_, TournamentInvitation>(
            r#"
            INSERT INTO tournament_invitations (tournament_id, user_id, invited_by, status, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .bind(invited_by)
        .bind(InvitationStatus::Pending.as_str())
        .bind(expires_at)
        .fetch_one(executor)
        .await?;

        Ok(invitation)
    }

    /// Find invitation by ID and lock the row until the transaction ends
    pub async fn find_by_id_for_update<'e, E>(
        executor: E,
        id: i64,
    ) -> AppResult<Option<TournamentInvitation>>
    where
        E: PgExecutor<'e>,
    {
        let invitation = sqlx::query_as::<_, TournamentInvitation>(
            r#"SELECT * FROM tournament_invitations WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(invitation)
    }

    /// The user's invitation to the tournament, locked until the transaction ends
    pub async fn find_for_user_for_update<'e, E>(
        executor: E,
        tournament_id: i64,
        user_id: i64,
    ) -> AppResult<Option<TournamentInvitation>>
    where
        E: PgExecutor<'e>,
    {
        let invitation = sqlx::query_as::<_, TournamentInvitation>(
            r#"
            SELECT * FROM tournament_invitations
            WHERE tournament_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(invitation)
    }

    /// Turn an answered or lapsed invitation back into a fresh pending one
    pub async fn reissue<'e, E>(
        executor: E,
        id: i64,
        invited_by: i64,
        expires_at: DateTime<Utc>,
    ) -> AppResult<TournamentInvitation>
    where
        E: PgExecutor<'e>,
    {
        let invitation = sqlx::query_as::<_, TournamentInvitation>(
            r#"
            UPDATE tournament_invitations
            SET status = $2, invited_by = $3, invited_at = NOW(),
                responded_at = NULL, expires_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(InvitationStatus::Pending.as_str())
        .bind(invited_by)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;

        Ok(invitation)
    }

    /// All invitations of a tournament
    pub async fn list_for_tournament(
        pool: &PgPool,
        tournament_id: i64,
    ) -> AppResult<Vec<TournamentInvitation>> {
        let invitations = sqlx::query_as::<_, TournamentInvitation>(
            r#"
            SELECT * FROM tournament_invitations
            WHERE tournament_id = $1
            ORDER BY invited_at, id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Invitations addressed to a user, optionally by status
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        status: Option<InvitationStatus>,
    ) -> AppResult<Vec<TournamentInvitation>> {
        let invitations = sqlx::query_as::<_, TournamentInvitation>(
            r#"
            SELECT * FROM tournament_invitations
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY invited_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Record an answer or expiry
    pub async fn set_status<'e, E>(
        executor: E,
        id: i64,
        status: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<TournamentInvitation>
    where
        E: PgExecutor<'e>,
    {
        let invitation = sqlx::query_as::<_, TournamentInvitation>(
            r#"
            UPDATE tournament_invitations
            SET status = $2, responded_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(responded_at)
        .fetch_one(executor)
        .await?;

        Ok(invitation)
    }

    /// Delete one invitation
    pub async fn delete<'e, E>(executor: E, id: i64) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(r#"DELETE FROM tournament_invitations WHERE id = $1"#)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Delete every pending invitation of a tournament
    pub async fn delete_pending<'e, E>(executor: E, tournament_id: i64) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"DELETE FROM tournament_invitations WHERE tournament_id = $1 AND status = $2"#,
        )
        .bind(tournament_id)
        .bind(InvitationStatus::Pending.as_str())
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
