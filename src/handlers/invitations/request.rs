//! Invitation request DTOs

use serde::Deserialize;

/// Answer to an invitation: `accepted` or `declined`
#[derive(Debug, Deserialize)]
pub struct RespondInvitationRequest {
    pub response: String,
}

/// Filter for the caller's invitations
#[derive(Debug, Deserialize)]
pub struct MyInvitationsQuery {
    pub status: Option<String>,
}
