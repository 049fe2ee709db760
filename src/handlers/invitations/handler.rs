//! Invitation handler implementations

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::{InvitationResponse, InvitationStatus, TournamentInvitation},
    services::{AuthorizationService, InvitationService},
    state::AppState,
};

use super::{
    request::{MyInvitationsQuery, RespondInvitationRequest},
    response::MyInvitationsResponse,
};

/// Invitations addressed to the caller, optionally filtered by status
pub async fn my_invitations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<MyInvitationsQuery>,
) -> AppResult<Json<MyInvitationsResponse>> {
    let user = AuthorizationService::authorize_request(state.db(), &auth_user, &[]).await?;

    let status = query
        .status
        .as_deref()
        .map(str::parse::<InvitationStatus>)
        .transpose()?;

    let invitations = InvitationService::list_mine(state.db(), &user, status).await?;

    Ok(Json(MyInvitationsResponse { invitations }))
}

/// Accept or decline an invitation
pub async fn respond_to_invitation(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<RespondInvitationRequest>,
) -> AppResult<Json<TournamentInvitation>> {
    let user = AuthorizationService::authorize_request(state.db(), &auth_user, &[]).await?;
    let response: InvitationResponse = payload.response.parse()?;

    let invitation = InvitationService::respond(state.db(), &user, id, response).await?;

    Ok(Json(invitation))
}
