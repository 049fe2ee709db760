//! Match model and the two-sided verification protocol
//!
//! A match carries two verification slots, one per player. Which slots are
//! required depends on who submitted the score:
//!
//! - submitted by player 1: only player 2 must confirm
//! - submitted by player 2: only player 1 must confirm
//! - submitted by anybody else: both players must confirm
//!
//! The stored `status` column is a cache of [`Match::derive_status`]; every
//! mutation in this module ends by re-deriving it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

text_enum! {
    /// How a match was played
    MatchType, "match type" {
        Casual => "casual",
        Tournament => "tournament",
    }
}

text_enum! {
    /// Lifecycle state of a submitted match
    MatchStatus, "match status" {
        PendingVerification => "pending_verification",
        Verified => "verified",
        Rejected => "rejected",
    }
}

impl MatchStatus {
    /// Settled matches accept no further verification
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

/// Match database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub player1_score: i32,
    pub player2_score: i32,
    #[sqlx(try_from = "String")]
    pub match_type: MatchType,
    #[sqlx(try_from = "String")]
    pub status: MatchStatus,
    pub submitted_by_id: i64,
    pub verified_by_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub notes: Option<String>,
    pub player1_verified: bool,
    pub player1_verified_by: Option<i64>,
    pub player2_verified: bool,
    pub player2_verified_by: Option<i64>,
    pub match_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

/// One of the two player positions of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSlot {
    One,
    Two,
}

/// Which slots must be confirmed before a match counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationRequirements {
    pub player1_needs_verification: bool,
    pub player2_needs_verification: bool,
    pub submitted_by_player: bool,
}

/// Reasons a user may not touch a verification slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("match has already been settled")]
    AlreadySettled,

    #[error("user is not a required verifier for this match")]
    NotARequiredVerifier,

    #[error("user has already verified this match")]
    AlreadyVerified,
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        AppError::Forbidden(err.to_string())
    }
}

impl Match {
    pub fn verification_requirements(&self) -> VerificationRequirements {
        let submitted_by_player1 = self.submitted_by_id == self.player1_id;
        let submitted_by_player2 = self.submitted_by_id == self.player2_id;

        VerificationRequirements {
            player1_needs_verification: !submitted_by_player1,
            player2_needs_verification: !submitted_by_player2,
            submitted_by_player: submitted_by_player1 || submitted_by_player2,
        }
    }

    /// Position of `user_id` in this match, if they played
    pub fn slot_of(&self, user_id: i64) -> Option<PlayerSlot> {
        if user_id == self.player1_id {
            Some(PlayerSlot::One)
        } else if user_id == self.player2_id {
            Some(PlayerSlot::Two)
        } else {
            None
        }
    }

    fn slot_required(&self, slot: PlayerSlot) -> bool {
        let requirements = self.verification_requirements();
        match slot {
            PlayerSlot::One => requirements.player1_needs_verification,
            PlayerSlot::Two => requirements.player2_needs_verification,
        }
    }

    fn slot_verified(&self, slot: PlayerSlot) -> bool {
        match slot {
            PlayerSlot::One => self.player1_verified,
            PlayerSlot::Two => self.player2_verified,
        }
    }

    fn set_slot(&mut self, slot: PlayerSlot, verified: bool, by: Option<i64>) {
        match slot {
            PlayerSlot::One => {
                self.player1_verified = verified;
                self.player1_verified_by = by;
            }
            PlayerSlot::Two => {
                self.player2_verified = verified;
                self.player2_verified_by = by;
            }
        }
    }

    /// True iff every required slot has been confirmed
    pub fn is_fully_verified(&self) -> bool {
        [PlayerSlot::One, PlayerSlot::Two]
            .into_iter()
            .all(|slot| !self.slot_required(slot) || self.slot_verified(slot))
    }

    pub fn derive_status(&self) -> MatchStatus {
        if self.rejected_at.is_some() {
            MatchStatus::Rejected
        } else if self.is_fully_verified() {
            MatchStatus::Verified
        } else {
            MatchStatus::PendingVerification
        }
    }

    pub fn is_settled(&self) -> bool {
        self.derive_status().is_settled()
    }

    /// Check whether `user_id` may still set their slot
    pub fn check_can_verify(&self, user_id: i64) -> Result<PlayerSlot, VerificationError> {
        if self.is_settled() {
            return Err(VerificationError::AlreadySettled);
        }

        let slot = self
            .slot_of(user_id)
            .filter(|slot| self.slot_required(*slot))
            .ok_or(VerificationError::NotARequiredVerifier)?;

        // A confirmed slot is final
        if self.slot_verified(slot) {
            return Err(VerificationError::AlreadyVerified);
        }

        Ok(slot)
    }

    pub fn can_user_verify(&self, user_id: i64) -> bool {
        self.check_can_verify(user_id).is_ok()
    }

    /// Satisfy the submitter's own slot when they are one of the players.
    ///
    /// Called once, right after the row is inserted.
    pub fn apply_submitter_verification(&mut self, now: DateTime<Utc>) {
        let submitter = self.submitted_by_id;
        if let Some(slot) = self.slot_of(submitter) {
            self.set_slot(slot, true, Some(submitter));
        }
        self.refresh_status(submitter, now);
    }

    /// Set `user_id`'s slot and re-derive the status
    pub fn verify_by_user(
        &mut self,
        user_id: i64,
        verified: bool,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let slot = self.check_can_verify(user_id)?;
        self.set_slot(slot, verified, verified.then_some(user_id));
        self.refresh_status(user_id, now);
        Ok(())
    }

    /// Administratively reject an unsettled match
    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.is_settled() {
            return Err(AppError::Conflict(format!(
                "Match is already {}",
                self.derive_status()
            )));
        }

        self.rejected_at = Some(now);
        self.status = self.derive_status();
        Ok(())
    }

    fn refresh_status(&mut self, actor: i64, now: DateTime<Utc>) {
        self.status = self.derive_status();

        if self.status == MatchStatus::Verified {
            self.verified_by_id = Some(actor);
            self.verified_at = Some(now);
        } else {
            self.verified_by_id = None;
            self.verified_at = None;
        }
    }

    /// Winner by higher score; `None` on a tie
    pub fn winner_id(&self) -> Option<i64> {
        match self.player1_score.cmp(&self.player2_score) {
            std::cmp::Ordering::Greater => Some(self.player1_id),
            std::cmp::Ordering::Less => Some(self.player2_id),
            std::cmp::Ordering::Equal => None,
        }
    }
}
