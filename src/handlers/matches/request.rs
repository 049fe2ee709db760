//! Match request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_MATCH_NOTES_LENGTH;

/// Score submission
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatchRequest {
    pub player1_id: i64,

    pub player2_id: i64,

    #[validate(range(min = 0))]
    pub player1_score: i32,

    #[validate(range(min = 0))]
    pub player2_score: i32,

    /// `casual` or `tournament`; forced to `tournament` when a tournament is given
    pub match_type: Option<String>,

    pub tournament_id: Option<i64>,

    #[validate(length(max = MAX_MATCH_NOTES_LENGTH))]
    pub notes: Option<String>,

    pub match_date: Option<DateTime<Utc>>,
}

/// Verification of one's own slot
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyMatchRequest {
    pub verified: bool,

    #[validate(length(max = MAX_MATCH_NOTES_LENGTH))]
    pub notes: Option<String>,
}

/// Administrative rejection
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RejectMatchRequest {
    #[validate(length(max = MAX_MATCH_NOTES_LENGTH))]
    pub notes: Option<String>,
}

/// List matches query parameters
#[derive(Debug, Deserialize)]
pub struct ListMatchesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub match_type: Option<String>,
    pub status: Option<String>,
    pub tournament_id: Option<i64>,
}
