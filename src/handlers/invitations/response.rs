//! Invitation response DTOs

use serde::Serialize;

use crate::models::TournamentInvitation;

/// Invitations addressed to the caller
#[derive(Debug, Serialize)]
pub struct MyInvitationsResponse {
    pub invitations: Vec<TournamentInvitation>,
}
