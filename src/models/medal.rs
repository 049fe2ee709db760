//! Medal model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

text_enum! {
    MedalType, "medal type" {
        Gold => "gold",
        Silver => "silver",
        Bronze => "bronze",
        Wood => "wood",
    }
}

impl MedalType {
    /// Medal for a 1-based final position
    pub fn for_position(position: i32) -> Self {
        match position {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            _ => Self::Wood,
        }
    }
}

/// Medal database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Medal {
    pub id: i64,
    pub user_id: i64,
    pub tournament_id: i64,
    pub position: i32,
    #[sqlx(try_from = "String")]
    pub medal_type: MedalType,
    pub created_at: DateTime<Utc>,
}

/// Per-type medal tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCounts {
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
    pub wood: i64,
    pub total: i64,
}

impl MedalCounts {
    pub fn add(&mut self, medal_type: MedalType, count: i64) {
        match medal_type {
            MedalType::Gold => self.gold += count,
            MedalType::Silver => self.silver += count,
            MedalType::Bronze => self.bronze += count,
            MedalType::Wood => self.wood += count,
        }
        self.total += count;
    }
}

impl FromIterator<MedalType> for MedalCounts {
    fn from_iter<I: IntoIterator<Item = MedalType>>(iter: I) -> Self {
        let mut counts = Self::default();
        for medal_type in iter {
            counts.add(medal_type, 1);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medal_for_position() {
        assert_eq!(MedalType::for_position(1), MedalType::Gold);
        assert_eq!(MedalType::for_position(2), MedalType::Silver);
        assert_eq!(MedalType::for_position(3), MedalType::Bronze);
        assert_eq!(MedalType::for_position(4), MedalType::Wood);
        assert_eq!(MedalType::for_position(17), MedalType::Wood);
    }

    #[test]
    fn test_counts_from_iter() {
        let counts: MedalCounts = [1, 2, 3, 4, 5].into_iter().map(MedalType::for_position).collect();
        assert_eq!(
            counts,
            MedalCounts {
                gold: 1,
                silver: 1,
                bronze: 1,
                wood: 2,
                total: 5,
            }
        );
    }
}
