//! Tournament model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

text_enum! {
    /// Tournament lifecycle: draft -> inviting -> active -> completed
    TournamentStatus, "tournament status" {
        Draft => "draft",
        Inviting => "inviting",
        Active => "active",
        Completed => "completed",
    }
}

impl TournamentStatus {
    /// The only status reachable from `self`, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::Inviting),
            Self::Inviting => Some(Self::Active),
            Self::Active => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Validate a lifecycle move; there are no backward transitions
    pub fn check_transition(&self, to: Self) -> Result<(), AppError> {
        if self.next() == Some(to) {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "Tournament cannot move from {self} to {to}"
            )))
        }
    }
}

/// Tournament database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: TournamentStatus,
    /// Visibility in the default listing; unrelated to `status`
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Conflict unless the tournament is currently in `expected`
    pub fn require_status(&self, expected: TournamentStatus) -> Result<(), AppError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "Tournament is {}, expected {expected}",
                self.status
            )))
        }
    }
}

/// Tournament participant model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentParticipant {
    pub id: i64,
    pub tournament_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Reject an end date that precedes the start date
pub fn validate_date_range(
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    match end_date {
        Some(end) if end < start_date => Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_lifecycle_is_linear() {
        use TournamentStatus::*;

        assert!(Draft.check_transition(Inviting).is_ok());
        assert!(Inviting.check_transition(Active).is_ok());
        assert!(Active.check_transition(Completed).is_ok());

        assert!(Draft.check_transition(Active).is_err());
        assert!(Active.check_transition(Inviting).is_err());
        assert!(Completed.check_transition(Draft).is_err());
        assert!(matches!(
            Inviting.check_transition(Inviting),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_date_range() {
        let start = Utc::now();
        assert!(validate_date_range(start, None).is_ok());
        assert!(validate_date_range(start, Some(start)).is_ok());
        assert!(validate_date_range(start, Some(start + Duration::days(2))).is_ok());
        assert!(validate_date_range(start, Some(start - Duration::hours(1))).is_err());
    }
}
