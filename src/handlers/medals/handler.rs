//! Medal handler implementations

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    constants::permissions,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{AuthorizationService, MedalService},
    state::AppState,
};

use super::response::{AwardMedalsResponse, TournamentMedalsResponse, UserMedalsResponse};

/// The caller's own medal tally
pub async fn my_medals(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserMedalsResponse>> {
    let user = AuthorizationService::authorize_request(state.db(), &auth_user, &[]).await?;

    let medals = MedalService::user_medal_counts(state.db(), user.id).await?;

    Ok(Json(UserMedalsResponse {
        user_id: user.id,
        medals,
    }))
}

/// Another user's medal tally
pub async fn user_medals(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserMedalsResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::USERS_CAN_VIEW_USER_LIST],
    )
    .await?;

    let medals = MedalService::user_medal_counts(state.db(), user_id).await?;

    Ok(Json(UserMedalsResponse { user_id, medals }))
}

/// Medals handed out in a tournament
pub async fn tournament_medals(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<TournamentMedalsResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::TOURNAMENTS_CAN_VIEW_ALL],
    )
    .await?;

    let medals = MedalService::tournament_medals(state.db(), id).await?;

    Ok(Json(TournamentMedalsResponse {
        tournament_id: id,
        medals,
    }))
}

/// Rank players and (re)award medals
pub async fn award_medals(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AwardMedalsResponse>> {
    AuthorizationService::authorize_request(
        state.db(),
        &auth_user,
        &[permissions::TOURNAMENTS_CAN_EDIT_ALL],
    )
    .await?;

    let awarded = MedalService::award_medals(state.db(), id).await?;

    Ok(Json(AwardMedalsResponse {
        tournament_id: id,
        awarded,
    }))
}
