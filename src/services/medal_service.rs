//! Medal service

use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::{MatchRepository, MedalRepository, TournamentRepository, UserRepository},
    error::{AppError, AppResult},
    models::{compute_player_stats, medal_ranking, Medal, MedalCounts},
};

/// Medal service
pub struct MedalService;

impl MedalService {
    /// Rank the tournament's players and persist one medal each.
    ///
    /// Re-running overwrites earlier awards for the same tournament.
    pub async fn award_medals(pool: &PgPool, tournament_id: i64) -> AppResult<MedalCounts> {
        if TournamentRepository::find_by_id(pool, tournament_id).await?.is_none() {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }

        let matches = MatchRepository::list_verified_for_tournament(pool, tournament_id).await?;
        let placings = medal_ranking(compute_player_stats(&matches));

        let mut tx = pool.begin().await?;
        for placing in &placings {
            MedalRepository::upsert(
                &mut *tx,
                placing.user_id,
                tournament_id,
                placing.position,
                placing.medal_type,
            )
            .await?;
        }
        tx.commit().await?;

        let counts: MedalCounts = placings.iter().map(|p| p.medal_type).collect();
        info!(
            tournament_id,
            gold = counts.gold,
            silver = counts.silver,
            bronze = counts.bronze,
            wood = counts.wood,
            "Medals awarded"
        );
        Ok(counts)
    }

    /// Medals of one tournament
    pub async fn tournament_medals(pool: &PgPool, tournament_id: i64) -> AppResult<Vec<Medal>> {
        if TournamentRepository::find_by_id(pool, tournament_id).await?.is_none() {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }
        MedalRepository::list_for_tournament(pool, tournament_id).await
    }

    /// Medal tally of one user
    pub async fn user_medal_counts(pool: &PgPool, user_id: i64) -> AppResult<MedalCounts> {
        if UserRepository::find_by_id(pool, user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        MedalRepository::counts_for_user(pool, user_id).await
    }
}
