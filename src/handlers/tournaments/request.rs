//! Tournament request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_TOURNAMENT_DESCRIPTION_LENGTH, MAX_TOURNAMENT_NAME_LENGTH},
    utils::validate_not_blank,
};

/// Create tournament request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTournamentRequest {
    #[validate(
        length(min = 1, max = MAX_TOURNAMENT_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = MAX_TOURNAMENT_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub start_date: DateTime<Utc>,

    pub end_date: Option<DateTime<Utc>>,

    /// Keep the tournament in `draft` instead of opening invitations
    #[serde(default)]
    pub draft: bool,
}

/// Update tournament request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTournamentRequest {
    #[validate(
        length(min = 1, max = MAX_TOURNAMENT_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = MAX_TOURNAMENT_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,
}

/// List tournaments query parameters
#[derive(Debug, Deserialize)]
pub struct ListTournamentsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Defaults to `true`
    pub active_only: Option<bool>,
}
