//! Tournament standings
//!
//! Statistics are derived on demand from the verified matches of a
//! tournament. Each match is one set; the higher score wins it and a tie
//! counts for neither player. Every ordering here ends with the user id
//! ascending so results are reproducible.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::{Match, MatchStatus, MedalType};

/// Aggregated results of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub user_id: i64,
    pub matches_played: i64,
    pub matches_won: i64,
    pub matches_lost: i64,
    pub sets_won: i64,
    pub sets_lost: i64,
    pub points_won: i64,
    pub points_lost: i64,
}

impl PlayerStats {
    fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn sets_delta(&self) -> i64 {
        self.sets_won - self.sets_lost
    }

    pub fn points_delta(&self) -> i64 {
        self.points_won - self.points_lost
    }

    pub fn win_percentage(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            self.matches_won as f64 / self.matches_played as f64 * 100.0
        }
    }

    fn record(&mut self, own_score: i32, opponent_score: i32) {
        self.matches_played += 1;
        self.points_won += i64::from(own_score);
        self.points_lost += i64::from(opponent_score);

        match own_score.cmp(&opponent_score) {
            Ordering::Greater => {
                self.matches_won += 1;
                self.sets_won += 1;
            }
            Ordering::Less => {
                self.matches_lost += 1;
                self.sets_lost += 1;
            }
            Ordering::Equal => {}
        }
    }
}

/// Per-player statistics over the verified matches in `matches`.
///
/// Returned in user id order.
pub fn compute_player_stats(matches: &[Match]) -> Vec<PlayerStats> {
    let mut stats: BTreeMap<i64, PlayerStats> = BTreeMap::new();

    for m in matches.iter().filter(|m| m.status == MatchStatus::Verified) {
        stats
            .entry(m.player1_id)
            .or_insert_with(|| PlayerStats::new(m.player1_id))
            .record(m.player1_score, m.player2_score);
        stats
            .entry(m.player2_id)
            .or_insert_with(|| PlayerStats::new(m.player2_id))
            .record(m.player2_score, m.player1_score);
    }

    stats.into_values().collect()
}

/// Public leaderboard: sets won, then points delta
pub fn leaderboard_order(stats: &mut [PlayerStats]) {
    stats.sort_by(|a, b| {
        b.sets_won
            .cmp(&a.sets_won)
            .then_with(|| b.points_delta().cmp(&a.points_delta()))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Admin statistics: matches won, then win percentage
pub fn admin_stats_order(stats: &mut [PlayerStats]) {
    stats.sort_by(|a, b| {
        b.matches_won
            .cmp(&a.matches_won)
            .then_with(|| b.win_percentage().total_cmp(&a.win_percentage()))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Final placing used for medals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placing {
    pub user_id: i64,
    pub position: i32,
    pub medal_type: MedalType,
}

/// Rank by sets won, sets delta, then points delta and assign medals
pub fn medal_ranking(mut stats: Vec<PlayerStats>) -> Vec<Placing> {
    stats.sort_by(|a, b| {
        b.sets_won
            .cmp(&a.sets_won)
            .then_with(|| b.sets_delta().cmp(&a.sets_delta()))
            .then_with(|| b.points_delta().cmp(&a.points_delta()))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    stats
        .into_iter()
        .zip(1..)
        .map(|(s, position)| Placing {
            user_id: s.user_id,
            position,
            medal_type: MedalType::for_position(position),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::tests::new_match;

    const A: i64 = 1;
    const B: i64 = 2;
    const C: i64 = 3;
    const D: i64 = 4;

    fn verified(p1: i64, p2: i64, s1: i32, s2: i32) -> Match {
        let mut m = new_match(p1, p2, p1);
        m.player1_score = s1;
        m.player2_score = s2;
        m.status = MatchStatus::Verified;
        m
    }

    fn stats_for(stats: &[PlayerStats], user_id: i64) -> PlayerStats {
        *stats.iter().find(|s| s.user_id == user_id).unwrap()
    }

    #[test]
    fn test_only_verified_matches_count() {
        let mut pending = verified(A, B, 21, 5);
        pending.status = MatchStatus::PendingVerification;
        let mut rejected = verified(A, B, 21, 5);
        rejected.status = MatchStatus::Rejected;

        let stats = compute_player_stats(&[pending, rejected, verified(A, B, 21, 19)]);
        let a = stats_for(&stats, A);
        assert_eq!(a.matches_played, 1);
        assert_eq!(a.points_won, 21);
        assert_eq!(a.points_lost, 19);
    }

    #[test]
    fn test_tie_counts_for_neither_side() {
        let stats = compute_player_stats(&[verified(A, B, 20, 20)]);
        for user in [A, B] {
            let s = stats_for(&stats, user);
            assert_eq!(s.matches_played, 1);
            assert_eq!(s.sets_won, 0);
            assert_eq!(s.sets_lost, 0);
            assert_eq!(s.matches_won, 0);
            assert_eq!(s.win_percentage(), 0.0);
        }
    }

    #[test]
    fn test_medal_ranking_assigns_positions() {
        // C beats everyone, A beats B
        let matches = [
            verified(C, A, 21, 10),
            verified(C, B, 21, 12),
            verified(A, B, 21, 15),
            verified(B, D, 21, 3),
            verified(A, D, 21, 2),
        ];
        let placings = medal_ranking(compute_player_stats(&matches));

        let order: Vec<(i64, MedalType)> =
            placings.iter().map(|p| (p.user_id, p.medal_type)).collect();
        assert_eq!(
            order,
            vec![
                (C, MedalType::Gold),
                (A, MedalType::Silver),
                (B, MedalType::Bronze),
                (D, MedalType::Wood),
            ]
        );
        assert_eq!(placings[0].position, 1);
        assert_eq!(placings[3].position, 4);
    }

    #[test]
    fn test_medal_ranking_is_deterministic() {
        let matches = [verified(A, B, 21, 10), verified(C, D, 21, 10)];
        let first = medal_ranking(compute_player_stats(&matches));
        let second = medal_ranking(compute_player_stats(&matches));
        assert_eq!(first, second);
        // A and C are indistinguishable; lower id ranks first
        assert_eq!(first[0].user_id, A);
        assert_eq!(first[1].user_id, C);
    }

    #[test]
    fn test_leaderboard_and_admin_orders_differ() {
        // A, B and D each win twice; A plays four times with a large
        // points surplus, B plays twice with a small one
        let matches = [
            verified(A, C, 21, 0),
            verified(A, C, 21, 0),
            verified(A, D, 0, 1),
            verified(A, D, 0, 1),
            verified(B, D, 21, 20),
            verified(B, D, 21, 20),
        ];
        let stats = compute_player_stats(&matches);

        let mut leaderboard = stats.clone();
        leaderboard_order(&mut leaderboard);
        let mut admin = stats;
        admin_stats_order(&mut admin);

        let leaderboard_ids: Vec<i64> = leaderboard.iter().map(|s| s.user_id).collect();
        let admin_ids: Vec<i64> = admin.iter().map(|s| s.user_id).collect();

        // Equal sets won; points delta puts A (+40) ahead of B (+2) and D (0)
        assert_eq!(leaderboard_ids, vec![A, B, D, C]);
        // Equal matches won; B's 100% beats the 50% of A and D
        assert_eq!(admin_ids, vec![B, A, D, C]);
        assert_ne!(leaderboard_ids, admin_ids);
    }

    #[test]
    fn test_deltas() {
        let stats = compute_player_stats(&[verified(A, B, 21, 15), verified(B, A, 21, 19)]);
        let a = stats_for(&stats, A);
        assert_eq!(a.sets_delta(), 0);
        assert_eq!(a.points_delta(), 4);
        assert_eq!(a.win_percentage(), 50.0);
    }
}
