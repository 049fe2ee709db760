//! Medal response DTOs

use serde::Serialize;

use crate::models::{Medal, MedalCounts};

/// Medal tally of one user
#[derive(Debug, Serialize)]
pub struct UserMedalsResponse {
    pub user_id: i64,
    pub medals: MedalCounts,
}

/// Medals of one tournament, best position first
#[derive(Debug, Serialize)]
pub struct TournamentMedalsResponse {
    pub tournament_id: i64,
    pub medals: Vec<Medal>,
}

/// Summary of an award run
#[derive(Debug, Serialize)]
pub struct AwardMedalsResponse {
    pub tournament_id: i64,
    pub awarded: MedalCounts,
}
