//! Tournament service
//!
//! Lifecycle transitions lock the tournament row so a start cannot race an
//! invitation or another transition.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::{
        InvitationRepository, MatchRepository, TournamentRepository, UserRepository,
    },
    error::{AppError, AppResult},
    models::{
        admin_stats_order, compute_player_stats, leaderboard_order, validate_date_range,
        PlayerStats, Tournament, TournamentParticipant, TournamentStatus, User,
    },
    utils::{page_offset, sanitize_string},
};

/// One row of a standings table
#[derive(Debug, Clone, Serialize)]
pub struct StandingsEntry {
    pub rank: usize,
    pub username: Option<String>,
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub sets_delta: i64,
    pub points_delta: i64,
    pub win_percentage: f64,
}

/// Which ordering a standings table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsView {
    /// Public: sets won, then points delta
    Leaderboard,
    /// Administrative: matches won, then win percentage
    AdminStats,
}

/// Tournament service
pub struct TournamentService;

impl TournamentService {
    /// Create a tournament, open for invitations unless created as a draft
    pub async fn create_tournament(
        pool: &PgPool,
        creator: &User,
        name: &str,
        description: Option<&str>,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        draft: bool,
    ) -> AppResult<Tournament> {
        validate_date_range(start_date, end_date)?;

        let status = if draft {
            TournamentStatus::Draft
        } else {
            TournamentStatus::Inviting
        };
        let description = description.map(sanitize_string);

        let tournament = TournamentRepository::create(
            pool,
            name.trim(),
            description.as_deref(),
            start_date,
            end_date,
            status,
            creator.id,
        )
        .await?;

        info!(
            tournament_id = tournament.id,
            created_by = creator.id,
            status = %tournament.status,
            "Tournament created"
        );
        Ok(tournament)
    }

    /// Get tournament by ID
    pub async fn get_tournament(pool: &PgPool, id: i64) -> AppResult<Tournament> {
        TournamentRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))
    }

    /// List tournaments; `active_only` hides deactivated ones
    pub async fn list_tournaments(
        pool: &PgPool,
        active_only: bool,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Tournament>, i64)> {
        let offset = page_offset(page, per_page);
        TournamentRepository::list(pool, active_only, offset, i64::from(per_page)).await
    }

    /// Update name, description and dates
    pub async fn update_tournament(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<Tournament> {
        let existing = Self::get_tournament(pool, id).await?;

        validate_date_range(
            start_date.unwrap_or(existing.start_date),
            end_date.or(existing.end_date),
        )?;

        let description = description.map(sanitize_string);
        TournamentRepository::update(
            pool,
            id,
            name.map(str::trim),
            description.as_deref(),
            start_date,
            end_date,
        )
        .await
    }

    /// draft -> inviting
    pub async fn open_invitations(pool: &PgPool, id: i64) -> AppResult<Tournament> {
        let mut tx = pool.begin().await?;
        let tournament = Self::lock(&mut tx, id).await?;
        tournament.status.check_transition(TournamentStatus::Inviting)?;

        let tournament =
            TournamentRepository::set_status(&mut *tx, id, TournamentStatus::Inviting).await?;
        tx.commit().await?;

        info!(tournament_id = id, "Tournament opened for invitations");
        Ok(tournament)
    }

    /// inviting -> active; needs at least one participant and drops pending invitations
    pub async fn start_tournament(pool: &PgPool, id: i64) -> AppResult<Tournament> {
        let mut tx = pool.begin().await?;
        let tournament = Self::lock(&mut tx, id).await?;
        tournament.status.check_transition(TournamentStatus::Active)?;

        if TournamentRepository::count_participants(&mut *tx, id).await? == 0 {
            return Err(AppError::Conflict(
                "Cannot start a tournament without participants".to_string(),
            ));
        }

        let purged = InvitationRepository::delete_pending(&mut *tx, id).await?;
        let tournament =
            TournamentRepository::set_status(&mut *tx, id, TournamentStatus::Active).await?;
        tx.commit().await?;

        info!(tournament_id = id, purged_invitations = purged, "Tournament started");
        Ok(tournament)
    }

    /// active -> completed; medals are awarded separately
    pub async fn complete_tournament(pool: &PgPool, id: i64) -> AppResult<Tournament> {
        let mut tx = pool.begin().await?;
        let tournament = Self::lock(&mut tx, id).await?;
        tournament.status.check_transition(TournamentStatus::Completed)?;

        let tournament =
            TournamentRepository::set_status(&mut *tx, id, TournamentStatus::Completed).await?;
        tx.commit().await?;

        info!(tournament_id = id, "Tournament completed");
        Ok(tournament)
    }

    /// Show or hide the tournament in the default listing
    pub async fn set_visibility(pool: &PgPool, id: i64, is_active: bool) -> AppResult<Tournament> {
        Self::get_tournament(pool, id).await?;
        let tournament = TournamentRepository::set_visibility(pool, id, is_active).await?;

        info!(tournament_id = id, is_active, "Tournament visibility changed");
        Ok(tournament)
    }

    /// Active participants
    pub async fn list_participants(
        pool: &PgPool,
        id: i64,
    ) -> AppResult<Vec<TournamentParticipant>> {
        Self::get_tournament(pool, id).await?;
        TournamentRepository::list_participants(pool, id).await
    }

    /// Soft-delete a participant
    pub async fn remove_participant(pool: &PgPool, id: i64, user_id: i64) -> AppResult<()> {
        Self::get_tournament(pool, id).await?;

        if !TournamentRepository::deactivate_participant(pool, id, user_id).await? {
            return Err(AppError::NotFound("Participant not found".to_string()));
        }

        info!(tournament_id = id, user_id, "Participant removed");
        Ok(())
    }

    /// Standings computed from the tournament's verified matches
    pub async fn standings(
        pool: &PgPool,
        id: i64,
        view: StandingsView,
    ) -> AppResult<Vec<StandingsEntry>> {
        let (tournament, matches) = futures::try_join!(
            TournamentRepository::find_by_id(pool, id),
            MatchRepository::list_verified_for_tournament(pool, id)
        )?;
        if tournament.is_none() {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }

        let mut stats = compute_player_stats(&matches);
        match view {
            StandingsView::Leaderboard => leaderboard_order(&mut stats),
            StandingsView::AdminStats => admin_stats_order(&mut stats),
        }

        let ids: Vec<i64> = stats.iter().map(|s| s.user_id).collect();
        let users = UserRepository::find_by_ids(pool, &ids).await?;

        Ok(build_standings(stats, &users))
    }

    async fn lock(tx: &mut sqlx::PgConnection, id: i64) -> AppResult<Tournament> {
        TournamentRepository::find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))
    }
}

fn build_standings(stats: Vec<PlayerStats>, users: &[User]) -> Vec<StandingsEntry> {
    stats
        .into_iter()
        .enumerate()
        .map(|(index, stats)| StandingsEntry {
            rank: index + 1,
            username: users
                .iter()
                .find(|u| u.id == stats.user_id)
                .map(|u| u.username.clone()),
            sets_delta: stats.sets_delta(),
            points_delta: stats.points_delta(),
            win_percentage: stats.win_percentage(),
            stats,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::services::auth_service::tests::{test_config, test_user};

    #[tokio::test]
    async fn test_huge_page_fails_cleanly_instead_of_overflowing() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy(&test_config().database.url)
            .unwrap();

        let result = TournamentService::list_tournaments(&pool, true, 50_000_000, 100).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn test_build_standings_ranks_in_order() {
        let stats = vec![
            PlayerStats {
                user_id: 3,
                matches_played: 2,
                matches_won: 2,
                sets_won: 2,
                points_won: 42,
                points_lost: 30,
                ..Default::default()
            },
            PlayerStats {
                user_id: 9,
                matches_played: 2,
                matches_lost: 2,
                sets_lost: 2,
                points_won: 30,
                points_lost: 42,
                ..Default::default()
            },
        ];

        let entries = build_standings(stats, &[test_user(3)]);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].username.as_deref(), Some("player3"));
        assert_eq!(entries[0].points_delta, 12);
        assert_eq!(entries[0].win_percentage, 100.0);
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].username, None);
        assert_eq!(entries[1].sets_delta, -2);
    }
}
