//! Tournament response DTOs

use serde::Serialize;

use crate::{
    models::{Tournament, TournamentInvitation, TournamentParticipant},
    services::{InviteOutcome, StandingsEntry},
};

/// Paginated tournament list
#[derive(Debug, Serialize)]
pub struct TournamentsListResponse {
    pub tournaments: Vec<Tournament>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Active participants of a tournament
#[derive(Debug, Serialize)]
pub struct ParticipantsListResponse {
    pub tournament_id: i64,
    pub participants: Vec<TournamentParticipant>,
}

/// Invitations of a tournament
#[derive(Debug, Serialize)]
pub struct InvitationsListResponse {
    pub tournament_id: i64,
    pub invitations: Vec<TournamentInvitation>,
}

/// Result of an invite call
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InviteResponse {
    Invited { invitation: TournamentInvitation },
    Joined { participant: TournamentParticipant },
}

impl From<InviteOutcome> for InviteResponse {
    fn from(outcome: InviteOutcome) -> Self {
        match outcome {
            InviteOutcome::Invited(invitation) => Self::Invited { invitation },
            InviteOutcome::Joined(participant) => Self::Joined { participant },
        }
    }
}

/// Standings table
#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub tournament_id: i64,
    pub standings: Vec<StandingsEntry>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_invite_response_is_tagged_by_outcome() {
        let participant = TournamentParticipant {
            id: 1,
            tournament_id: 4,
            user_id: 9,
            joined_at: Utc::now(),
            is_active: true,
        };

        let json = serde_json::to_value(InviteResponse::from(InviteOutcome::Joined(participant)))
            .unwrap();
        assert_eq!(json["outcome"], "joined");
        assert_eq!(json["participant"]["user_id"], 9);
    }
}
