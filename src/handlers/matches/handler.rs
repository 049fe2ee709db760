//! Match handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    constants::{permissions, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    db::repositories::MatchFilter,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::{MatchStatus, MatchType},
    services::{AuthorizationService, MatchService, MatchSubmission, VerificationStatus},
    state::AppState,
};

use super::{
    request::{CreateMatchRequest, ListMatchesQuery, RejectMatchRequest, VerifyMatchRequest},
    response::{MatchResponse, MatchesListResponse, PendingMatchesResponse},
};

/// List matches (paginated, filterable)
pub async fn list_matches(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListMatchesQuery>,
) -> AppResult<Json<MatchesListResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_VIEW_ALL],
    )
    .await?;

    let filter = MatchFilter {
        match_type: query
            .match_type
            .as_deref()
            .map(str::parse::<MatchType>)
            .transpose()?,
        status: query
            .status
            .as_deref()
            .map(str::parse::<MatchStatus>)
            .transpose()?,
        tournament_id: query.tournament_id,
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let (matches, total) = MatchService::list_matches(state.db(), filter, page, per_page).await?;

    Ok(Json(MatchesListResponse {
        matches: matches.into_iter().map(MatchResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Submit a match score
pub async fn create_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateMatchRequest>,
) -> AppResult<(StatusCode, Json<MatchResponse>)> {
    let submitter = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_CREATE],
    )
    .await?;

    payload.validate()?;

    let submission = MatchSubmission {
        player1_id: payload.player1_id,
        player2_id: payload.player2_id,
        player1_score: payload.player1_score,
        player2_score: payload.player2_score,
        match_type: payload
            .match_type
            .as_deref()
            .map(str::parse::<MatchType>)
            .transpose()?,
        tournament_id: payload.tournament_id,
        notes: payload.notes.as_deref(),
        match_date: payload.match_date,
    };

    let m = MatchService::create_match(state.db(), &submitter, submission).await?;

    Ok((StatusCode::CREATED, Json(m.into())))
}

/// Matches waiting for the caller's confirmation
pub async fn pending_verification(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<PendingMatchesResponse>> {
    let user = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_VERIFY],
    )
    .await?;

    let matches = MatchService::pending_for_user(state.db(), &user).await?;

    Ok(Json(PendingMatchesResponse {
        matches: matches.into_iter().map(MatchResponse::from).collect(),
    }))
}

/// Get a match
pub async fn get_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MatchResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_VIEW_ALL],
    )
    .await?;

    let m = MatchService::get_match(state.db(), id).await?;

    Ok(Json(m.into()))
}

/// Confirm (or decline) the caller's side of a match
pub async fn verify_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<VerifyMatchRequest>,
) -> AppResult<Json<MatchResponse>> {
    let user = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_VERIFY],
    )
    .await?;

    payload.validate()?;

    let m = MatchService::verify_match(
        state.db(),
        &user,
        id,
        payload.verified,
        payload.notes.as_deref(),
    )
    .await?;

    Ok(Json(m.into()))
}

/// Reject a match
pub async fn reject_match(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    payload: Option<Json<RejectMatchRequest>>,
) -> AppResult<Json<MatchResponse>> {
    let actor = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_EDIT_ALL],
    )
    .await?;

    let Json(payload) = payload.unwrap_or_default();
    payload.validate()?;

    let m = MatchService::reject_match(state.db(), &actor, id, payload.notes.as_deref()).await?;

    Ok(Json(m.into()))
}

/// Verification progress of a match
pub async fn verification_status(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<VerificationStatus>> {
    let user = AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::MATCHES_CAN_VIEW_ALL],
    )
    .await?;

    let status = MatchService::verification_status(state.db(), &user, id).await?;

    Ok(Json(status))
}
