//! Tournament invitation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::TournamentStatus;
use crate::error::AppError;

text_enum! {
    InvitationStatus, "invitation status" {
        Pending => "pending",
        Accepted => "accepted",
        Declined => "declined",
        Expired => "expired",
    }
}

text_enum! {
    /// Answer an invitee may give
    InvitationResponse, "invitation response" {
        Accepted => "accepted",
        Declined => "declined",
    }
}

impl From<InvitationResponse> for InvitationStatus {
    fn from(response: InvitationResponse) -> Self {
        match response {
            InvitationResponse::Accepted => InvitationStatus::Accepted,
            InvitationResponse::Declined => InvitationStatus::Declined,
        }
    }
}

/// Tournament invitation database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentInvitation {
    pub id: i64,
    pub tournament_id: i64,
    pub user_id: i64,
    pub invited_by: i64,
    #[sqlx(try_from = "String")]
    pub status: InvitationStatus,
    pub invited_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TournamentInvitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// An open invitation the invitee can still answer blocks a new one;
    /// answered or lapsed rows get reissued.
    pub fn blocks_reinvite(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired(now)
    }
}

/// What answering an invitation should do to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The tournament left `inviting`; drop the invitation
    Stale,
    /// Past its expiry; mark it expired
    Expired,
    /// Record the answer
    Apply(InvitationStatus),
}

/// Decide how a response to `invitation` is handled.
///
/// Only a pending invitation can be answered. `Stale` and `Expired` still
/// require their writes to be committed before the caller reports a conflict.
pub fn evaluate_response(
    invitation: &TournamentInvitation,
    tournament_status: TournamentStatus,
    response: InvitationResponse,
    now: DateTime<Utc>,
) -> Result<ResponseOutcome, AppError> {
    if invitation.status != InvitationStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Invitation has already been {}",
            invitation.status
        )));
    }

    if tournament_status != TournamentStatus::Inviting {
        return Ok(ResponseOutcome::Stale);
    }

    if invitation.is_expired(now) {
        return Ok(ResponseOutcome::Expired);
    }

    Ok(ResponseOutcome::Apply(response.into()))
}
