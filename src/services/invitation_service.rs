//! Tournament invitation service

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::{InvitationRepository, TournamentRepository, UserRepository},
    error::{AppError, AppResult},
    models::{
        evaluate_response, InvitationResponse, InvitationStatus, ResponseOutcome,
        TournamentInvitation, TournamentParticipant, TournamentStatus, User,
    },
};

/// Result of inviting a user
#[derive(Debug)]
pub enum InviteOutcome {
    /// A pending invitation was created
    Invited(TournamentInvitation),
    /// The inviter invited themselves and joined directly
    Joined(TournamentParticipant),
}

/// Invitation service
pub struct InvitationService;

impl InvitationService {
    /// Invite `invitee_id` to a tournament that is collecting participants
    pub async fn invite_user(
        pool: &PgPool,
        inviter: &User,
        tournament_id: i64,
        invitee_id: i64,
        expiry_days: i64,
    ) -> AppResult<InviteOutcome> {
        let mut tx = pool.begin().await?;

        let tournament = TournamentRepository::find_by_id_for_update(&mut *tx, tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        if UserRepository::find_by_id(&mut *tx, invitee_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tournament.require_status(TournamentStatus::Inviting)?;

        if TournamentRepository::is_active_participant(&mut *tx, tournament_id, invitee_id).await? {
            return Err(AppError::Conflict(
                "User is already a participant".to_string(),
            ));
        }

        let now = Utc::now();
        let existing =
            InvitationRepository::find_for_user_for_update(&mut *tx, tournament_id, invitee_id)
                .await?;
        if existing.as_ref().is_some_and(|inv| inv.blocks_reinvite(now)) {
            return Err(AppError::Conflict("User has already been invited".to_string()));
        }

        let outcome = if inviter.id == invitee_id {
            let participant =
                TournamentRepository::add_participant(&mut *tx, tournament_id, invitee_id).await?;
            info!(tournament_id, user_id = invitee_id, "Organizer joined tournament");
            InviteOutcome::Joined(participant)
        } else {
            let expires_at = now + Duration::days(expiry_days);
            let invitation = match existing {
                Some(previous) => {
                    InvitationRepository::reissue(&mut *tx, previous.id, inviter.id, expires_at)
                        .await?
                }
                None => {
                    InvitationRepository::create(
                        &mut *tx,
                        tournament_id,
                        invitee_id,
                        inviter.id,
                        expires_at,
                    )
                    .await?
                }
            };
            info!(
                tournament_id,
                user_id = invitee_id,
                invited_by = inviter.id,
                "User invited to tournament"
            );
            InviteOutcome::Invited(invitation)
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Accept or decline an invitation addressed to `user`
    pub async fn respond(
        pool: &PgPool,
        user: &User,
        invitation_id: i64,
        response: InvitationResponse,
    ) -> AppResult<TournamentInvitation> {
        let mut tx = pool.begin().await?;

        let invitation = InvitationRepository::find_by_id_for_update(&mut *tx, invitation_id)
            .await?
            .filter(|invitation| invitation.user_id == user.id)
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        let tournament = TournamentRepository::find_by_id(&mut *tx, invitation.tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        let now = Utc::now();
        match evaluate_response(&invitation, tournament.status, response, now)? {
            ResponseOutcome::Stale => {
                InvitationRepository::delete(&mut *tx, invitation.id).await?;
                tx.commit().await?;
                Err(AppError::Conflict(format!(
                    "Tournament is {} and no longer accepts responses",
                    tournament.status
                )))
            }
            ResponseOutcome::Expired => {
                InvitationRepository::set_status(
                    &mut *tx,
                    invitation.id,
                    InvitationStatus::Expired,
                    now,
                )
                .await?;
                tx.commit().await?;
                Err(AppError::Conflict("Invitation has expired".to_string()))
            }
            ResponseOutcome::Apply(status) => {
                let updated =
                    InvitationRepository::set_status(&mut *tx, invitation.id, status, now).await?;
                if status == InvitationStatus::Accepted {
                    TournamentRepository::add_participant(
                        &mut *tx,
                        invitation.tournament_id,
                        user.id,
                    )
                    .await?;
                }
                tx.commit().await?;

                info!(
                    invitation_id = updated.id,
                    tournament_id = updated.tournament_id,
                    user_id = user.id,
                    status = %updated.status,
                    "Invitation answered"
                );
                Ok(updated)
            }
        }
    }

    /// Invitations of one tournament
    pub async fn list_for_tournament(
        pool: &PgPool,
        tournament_id: i64,
    ) -> AppResult<Vec<TournamentInvitation>> {
        if TournamentRepository::find_by_id(pool, tournament_id).await?.is_none() {
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }
        InvitationRepository::list_for_tournament(pool, tournament_id).await
    }

    /// Invitations addressed to `user`
    pub async fn list_mine(
        pool: &PgPool,
        user: &User,
        status: Option<InvitationStatus>,
    ) -> AppResult<Vec<TournamentInvitation>> {
        InvitationRepository::list_for_user(pool, user.id, status).await
    }
}
