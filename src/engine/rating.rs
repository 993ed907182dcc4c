//! ELO-style rating replay (K-factor drops once a participant leaves the
//! provisional period).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CompletedMatch, ParticipantId};

/// Seed rating for every participant before their first completed match.
pub const INITIAL_RATING: f64 = 1200.0;

/// Update-rate policy used during replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingPolicy {
    /// K while `matches_played < provisional_threshold`.
    pub provisional_k: f64,
    /// K afterwards.
    pub established_k: f64,
    pub provisional_threshold: u32,
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            provisional_k: 40.0,
            established_k: 20.0,
            provisional_threshold: 10,
        }
    }
}

impl RatingPolicy {
    /// K-factor for a participant, evaluated from their own match count.
    pub fn k_factor(&self, state: &RatingState) -> f64 {
        if state.matches_played < self.provisional_threshold {
            self.provisional_k
        } else {
            self.established_k
        }
    }
}

/// Current rating of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingState {
    pub rating: f64,
    pub matches_played: u32,
    pub is_provisional: bool,
}

impl Default for RatingState {
    fn default() -> Self {
        Self {
            rating: INITIAL_RATING,
            matches_played: 0,
            is_provisional: true,
        }
    }
}

impl RatingState {
    fn after_match(self, policy: &RatingPolicy, actual: f64, expected: f64) -> Self {
        let k = policy.k_factor(&self);
        let matches_played = self.matches_played + 1;
        Self {
            rating: self.rating + k * (actual - expected),
            matches_played,
            is_provisional: matches_played < policy.provisional_threshold,
        }
    }
}

/// Probability that a player rated `r1` beats one rated `r2`.
pub fn expected_score(r1: f64, r2: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((r2 - r1) / 400.0))
}

/// Apply one match result to both sides, using the ratings as of
/// immediately before the match.
pub fn rate_match(
    policy: &RatingPolicy,
    player1: &RatingState,
    player2: &RatingState,
    player1_won: bool,
) -> (RatingState, RatingState) {
    let expected1 = expected_score(player1.rating, player2.rating);
    let expected2 = 1.0 - expected1;
    let actual1 = if player1_won { 1.0 } else { 0.0 };
    let actual2 = 1.0 - actual1;

    (
        player1.after_match(policy, actual1, expected1),
        player2.after_match(policy, actual2, expected2),
    )
}

/// Replay the full history once, from seed, and return the final state of
/// every participant that played at least one match.
///
/// Same input, same output: nothing is carried over between calls.
pub fn replay_ratings(
    matches: &[CompletedMatch],
    policy: &RatingPolicy,
) -> HashMap<ParticipantId, RatingState> {
    let mut ratings: HashMap<ParticipantId, RatingState> = HashMap::new();

    for m in matches {
        let r1 = ratings.get(&m.player1_id).copied().unwrap_or_default();
        let r2 = ratings.get(&m.player2_id).copied().unwrap_or_default();

        let (next1, next2) = rate_match(policy, &r1, &r2, m.player1_won());
        ratings.insert(m.player1_id, next1);
        ratings.insert(m.player2_id, next2);
    }

    ratings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_scores_are_complementary() {
        let e = expected_score(1300.0, 1100.0);
        assert!(e > 0.5);
        assert!((e + expected_score(1100.0, 1300.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn k_factor_switches_at_threshold() {
        let policy = RatingPolicy::default();
        let mut state = RatingState::default();
        state.matches_played = 9;
        assert_eq!(policy.k_factor(&state), 40.0);
        state.matches_played = 10;
        assert_eq!(policy.k_factor(&state), 20.0);
    }

    #[test]
    fn provisional_flag_clears_on_tenth_match() {
        let policy = RatingPolicy::default();
        let mut state = RatingState {
            matches_played: 9,
            ..RatingState::default()
        };
        state = state.after_match(&policy, 1.0, 0.5);
        assert_eq!(state.matches_played, 10);
        assert!(!state.is_provisional);
    }
}
