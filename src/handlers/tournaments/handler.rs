//! Tournament handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    constants::{permissions, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    handlers::users::MessageResponse,
    middleware::auth::AuthenticatedUser,
    models::{Tournament, User},
    services::{AuthorizationService, InvitationService, StandingsView, TournamentService},
    state::AppState,
};

use super::{
    request::{CreateTournamentRequest, ListTournamentsQuery, UpdateTournamentRequest},
    response::{
        InvitationsListResponse, InviteResponse, ParticipantsListResponse, StandingsResponse,
        TournamentsListResponse,
    },
};

/// List tournaments (paginated)
pub async fn list_tournaments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListTournamentsQuery>,
) -> AppResult<Json<TournamentsListResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::TOURNAMENTS_CAN_VIEW_ALL],
    )
    .await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let active_only = query.active_only.unwrap_or(true);

    let (tournaments, total) =
        TournamentService::list_tournaments(state.db(), active_only, page, per_page).await?;

    Ok(Json(TournamentsListResponse {
        tournaments,
        total,
        page,
        per_page,
    }))
}

/// Create a tournament
pub async fn create_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateTournamentRequest>,
) -> AppResult<(StatusCode, Json<Tournament>)> {
    let creator = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::TOURNAMENTS_CAN_CREATE],
    )
    .await?;

    payload.validate()?;

    let tournament = TournamentService::create_tournament(
        state.db(),
        &creator,
        &payload.name,
        payload.description.as_deref(),
        payload.start_date,
        payload.end_date,
        payload.draft,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Get a tournament
pub async fn get_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Tournament>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::TOURNAMENTS_CAN_VIEW_ALL],
    )
    .await?;

    let tournament = TournamentService::get_tournament(state.db(), id).await?;

    Ok(Json(tournament))
}

/// Update tournament details
pub async fn update_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTournamentRequest>,
) -> AppResult<Json<Tournament>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::TOURNAMENTS_CAN_EDIT_ALL],
    )
    .await?;

    payload.validate()?;

    let tournament = TournamentService::update_tournament(
        state.db(),
        id,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.start_date,
        payload.end_date,
    )
    .await?;

    Ok(Json(tournament))
}

/// Open a draft tournament for invitations
pub async fn open_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Tournament>> {
    require_edit(&state, &auth_user).await?;
    Ok(Json(TournamentService::open_invitations(state.db(), id).await?))
}

/// Start play
pub async fn start_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Tournament>> {
    require_edit(&state, &auth_user).await?;
    Ok(Json(TournamentService::start_tournament(state.db(), id).await?))
}

/// Finish play
pub async fn complete_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Tournament>> {
    require_edit(&state, &auth_user).await?;
    Ok(Json(TournamentService::complete_tournament(state.db(), id).await?))
}

/// Show the tournament in the default listing
pub async fn activate_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Tournament>> {
    require_edit(&state, &auth_user).await?;
    Ok(Json(TournamentService::set_visibility(state.db(), id, true).await?))
}

/// Hide the tournament from the default listing
pub async fn deactivate_tournament(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Tournament>> {
    require_edit(&state, &auth_user).await?;
    Ok(Json(TournamentService::set_visibility(state.db(), id, false).await?))
}

/// List active participants
pub async fn list_participants(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ParticipantsListResponse>> {
    require_view(&state, &auth_user).await?;

    let participants = TournamentService::list_participants(state.db(), id).await?;

    Ok(Json(ParticipantsListResponse {
        tournament_id: id,
        participants,
    }))
}

/// Remove a participant
pub async fn remove_participant(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    require_edit(&state, &auth_user).await?;

    TournamentService::remove_participant(state.db(), id, user_id).await?;

    Ok(Json(MessageResponse {
        message: "Participant removed".to_string(),
    }))
}

/// List a tournament's invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<InvitationsListResponse>> {
    require_view(&state, &auth_user).await?;

    let invitations = InvitationService::list_for_tournament(state.db(), id).await?;

    Ok(Json(InvitationsListResponse {
        tournament_id: id,
        invitations,
    }))
}

/// Invite a user
pub async fn invite_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> AppResult<(StatusCode, Json<InviteResponse>)> {
    let inviter = require_edit(&state, &auth_user).await?;

    let outcome = InvitationService::invite_user(
        state.db(),
        &inviter,
        id,
        user_id,
        state.config().tournament.invitation_expiry_days,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Public leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StandingsResponse>> {
    let standings =
        TournamentService::standings(state.db(), id, StandingsView::Leaderboard).await?;

    Ok(Json(StandingsResponse {
        tournament_id: id,
        standings,
    }))
}

/// Administrative statistics
pub async fn stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<StandingsResponse>> {
    require_view(&state, &auth_user).await?;

    let standings =
        TournamentService::standings(state.db(), id, StandingsView::AdminStats).await?;

    Ok(Json(StandingsResponse {
        tournament_id: id,
        standings,
    }))
}

async fn require_view(state: &AppState, auth_user: &AuthenticatedUser) -> AppResult<User> {
    AuthorizationService::authorize_request(
        state.db(),
        auth_user,
        &[permissions::TOURNAMENTS_CAN_VIEW_ALL],
    )
    .await
}

async fn require_edit(state: &AppState, auth_user: &AuthenticatedUser) -> AppResult<User> {
    AuthorizationService::authorize_request(
        state.db(),
        auth_user,
        &[permissions::TOURNAMENTS_CAN_EDIT_ALL],
    )
    .await
}
