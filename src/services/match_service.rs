//! Match lifecycle service
//!
//! Every write runs in one transaction. Verification and rejection lock the
//! match row first so concurrent calls serialize on it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::{
        MatchFilter, MatchRepository, NewMatch, TournamentRepository, UserRepository,
    },
    error::{AppError, AppResult},
    models::{Match, MatchType, TournamentStatus, User},
    utils::{page_offset, sanitize_string},
};

/// A score submission
#[derive(Debug)]
pub struct MatchSubmission<'a> {
    pub player1_id: i64,
    pub player2_id: i64,
    pub player1_score: i32,
    pub player2_score: i32,
    pub match_type: Option<MatchType>,
    pub tournament_id: Option<i64>,
    pub notes: Option<&'a str>,
    pub match_date: Option<DateTime<Utc>>,
}

/// Verification progress of one match as seen by the caller
#[derive(Debug, Clone, Serialize)]
pub struct VerificationStatus {
    pub match_id: i64,
    pub status: crate::models::MatchStatus,
    pub player1_verified: bool,
    pub player1_verified_by: Option<i64>,
    pub player2_verified: bool,
    pub player2_verified_by: Option<i64>,
    pub player1_needs_verification: bool,
    pub player2_needs_verification: bool,
    pub submitted_by_player: bool,
    pub is_fully_verified: bool,
    pub can_current_user_verify: bool,
}

/// Match service
pub struct MatchService;

impl MatchService {
    /// Record a match; the submitter's own slot is satisfied immediately
    pub async fn create_match(
        pool: &PgPool,
        submitter: &User,
        submission: MatchSubmission<'_>,
    ) -> AppResult<Match> {
        if submission.player1_id == submission.player2_id {
            return Err(AppError::Validation(
                "A match needs two different players".to_string(),
            ));
        }
        if submission.player1_score < 0 || submission.player2_score < 0 {
            return Err(AppError::Validation("Scores cannot be negative".to_string()));
        }

        let match_type = resolve_match_type(submission.match_type, submission.tournament_id)?;

        for player_id in [submission.player1_id, submission.player2_id] {
            if UserRepository::find_by_id(pool, player_id).await?.is_none() {
                return Err(AppError::Validation(format!("Player {player_id} does not exist")));
            }
        }

        let mut tx = pool.begin().await?;

        if let Some(tournament_id) = submission.tournament_id {
            let tournament = TournamentRepository::find_by_id(&mut *tx, tournament_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!("Tournament {tournament_id} does not exist"))
                })?;
            tournament.require_status(TournamentStatus::Active)?;

            for player_id in [submission.player1_id, submission.player2_id] {
                if !TournamentRepository::is_active_participant(&mut *tx, tournament_id, player_id)
                    .await?
                {
                    return Err(AppError::Validation(format!(
                        "Player {player_id} is not a participant of this tournament"
                    )));
                }
            }
        }

        let notes = submission.notes.map(sanitize_string);
        let new = NewMatch {
            player1_id: submission.player1_id,
            player2_id: submission.player2_id,
            player1_score: submission.player1_score,
            player2_score: submission.player2_score,
            match_type,
            submitted_by_id: submitter.id,
            tournament_id: submission.tournament_id,
            notes: notes.as_deref(),
            match_date: submission.match_date,
        };

        let mut m = MatchRepository::create(&mut *tx, &new).await?;
        m.apply_submitter_verification(Utc::now());
        let m = MatchRepository::save_state(&mut *tx, &m).await?;

        tx.commit().await?;

        info!(
            match_id = m.id,
            submitted_by = submitter.id,
            status = %m.status,
            "Match recorded"
        );
        Ok(m)
    }

    /// Get match by ID
    pub async fn get_match(pool: &PgPool, id: i64) -> AppResult<Match> {
        MatchRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))
    }

    /// List matches with pagination
    pub async fn list_matches(
        pool: &PgPool,
        filter: MatchFilter,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Match>, i64)> {
        let offset = page_offset(page, per_page);
        MatchRepository::list(pool, filter, offset, i64::from(per_page)).await
    }

    /// Set the caller's verification slot
    pub async fn verify_match(
        pool: &PgPool,
        user: &User,
        match_id: i64,
        verified: bool,
        notes: Option<&str>,
    ) -> AppResult<Match> {
        let mut tx = pool.begin().await?;

        let mut m = MatchRepository::find_by_id_for_update(&mut *tx, match_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        m.verify_by_user(user.id, verified, Utc::now())?;
        if let Some(notes) = notes {
            m.notes = Some(sanitize_string(notes));
        }

        let m = MatchRepository::save_state(&mut *tx, &m).await?;
        tx.commit().await?;

        info!(
            match_id = m.id,
            user_id = user.id,
            verified,
            status = %m.status,
            "Match verification recorded"
        );
        Ok(m)
    }

    /// Administratively reject an unsettled match
    pub async fn reject_match(
        pool: &PgPool,
        actor: &User,
        match_id: i64,
        notes: Option<&str>,
    ) -> AppResult<Match> {
        let mut tx = pool.begin().await?;

        let mut m = MatchRepository::find_by_id_for_update(&mut *tx, match_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        m.reject(Utc::now())?;
        if let Some(notes) = notes {
            m.notes = Some(sanitize_string(notes));
        }

        let m = MatchRepository::save_state(&mut *tx, &m).await?;
        tx.commit().await?;

        info!(match_id = m.id, rejected_by = actor.id, "Match rejected");
        Ok(m)
    }

    /// Verification progress as seen by `user`
    pub async fn verification_status(
        pool: &PgPool,
        user: &User,
        match_id: i64,
    ) -> AppResult<VerificationStatus> {
        let m = Self::get_match(pool, match_id).await?;
        Ok(describe_verification(&m, user.id))
    }

    /// Pending matches still waiting for `user`'s confirmation
    pub async fn pending_for_user(pool: &PgPool, user: &User) -> AppResult<Vec<Match>> {
        let matches = MatchRepository::list_pending_involving(pool, user.id).await?;
        Ok(matches
            .into_iter()
            .filter(|m| m.can_user_verify(user.id))
            .collect())
    }
}

/// Tournament matches are always of type `tournament`
fn resolve_match_type(
    requested: Option<MatchType>,
    tournament_id: Option<i64>,
) -> AppResult<MatchType> {
    match (requested, tournament_id) {
        (_, Some(_)) => Ok(MatchType::Tournament),
        (Some(MatchType::Tournament), None) => Err(AppError::Validation(
            "Tournament matches require a tournament_id".to_string(),
        )),
        (requested, None) => Ok(requested.unwrap_or(MatchType::Casual)),
    }
}

fn describe_verification(m: &Match, user_id: i64) -> VerificationStatus {
    let requirements = m.verification_requirements();
    VerificationStatus {
        match_id: m.id,
        status: m.status,
        player1_verified: m.player1_verified,
        player1_verified_by: m.player1_verified_by,
        player2_verified: m.player2_verified,
        player2_verified_by: m.player2_verified_by,
        player1_needs_verification: requirements.player1_needs_verification,
        player2_needs_verification: requirements.player2_needs_verification,
        submitted_by_player: requirements.submitted_by_player,
        is_fully_verified: m.is_fully_verified(),
        can_current_user_verify: m.can_user_verify(user_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::tests::new_match;

    #[test]
    fn test_resolve_match_type() {
        assert_eq!(resolve_match_type(None, None).unwrap(), MatchType::Casual);
        assert_eq!(
            resolve_match_type(Some(MatchType::Casual), Some(4)).unwrap(),
            MatchType::Tournament
        );
        assert!(matches!(
            resolve_match_type(Some(MatchType::Tournament), None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_describe_verification_for_each_side() {
        let mut m = new_match(1, 2, 1);
        m.apply_submitter_verification(Utc::now());

        let for_opponent = describe_verification(&m, 2);
        assert!(for_opponent.player1_verified);
        assert!(!for_opponent.player1_needs_verification);
        assert!(for_opponent.player2_needs_verification);
        assert!(for_opponent.submitted_by_player);
        assert!(!for_opponent.is_fully_verified);
        assert!(for_opponent.can_current_user_verify);

        let for_submitter = describe_verification(&m, 1);
        assert!(!for_submitter.can_current_user_verify);
    }
}
