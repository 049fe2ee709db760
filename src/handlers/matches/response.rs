//! Match response DTOs

use serde::Serialize;

use crate::models::Match;

/// Match with derived verification facts
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub details: Match,
    pub is_fully_verified: bool,
    pub winner_id: Option<i64>,
}

impl From<Match> for MatchResponse {
    fn from(m: Match) -> Self {
        Self {
            is_fully_verified: m.is_fully_verified(),
            winner_id: m.winner_id(),
            details: m,
        }
    }
}

/// Paginated match list
#[derive(Debug, Serialize)]
pub struct MatchesListResponse {
    pub matches: Vec<MatchResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Pending matches awaiting the caller
#[derive(Debug, Serialize)]
pub struct PendingMatchesResponse {
    pub matches: Vec<MatchResponse>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::matches::tests::new_match;

    #[test]
    fn test_match_response_flattens_row() {
        let mut m = new_match(1, 2, 1);
        m.apply_submitter_verification(Utc::now());

        let json = serde_json::to_value(MatchResponse::from(m)).unwrap();
        assert_eq!(json["player1_id"], 1);
        assert_eq!(json["status"], "pending_verification");
        assert_eq!(json["is_fully_verified"], false);
        assert_eq!(json["winner_id"], 1);
    }
}
