//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use league_server::engine::{CompletedMatch, Participant, PendingFixture, StandingRow};
use uuid::Uuid;

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn participant(n: u128, name: &str) -> Participant {
    Participant {
        id: id(n),
        name: name.to_string(),
    }
}

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap() + Duration::minutes(minute)
}

/// Builds a replay-ordered history: every match completes one minute
/// after the previous one.
#[derive(Default)]
pub struct History {
    matches: Vec<CompletedMatch>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(mut self, p1: u128, p2: u128, s1: i32, s2: i32) -> Self {
        let seq = self.matches.len() as i64;
        self.matches.push(CompletedMatch {
            id: Uuid::from_u128(10_000 + seq as u128),
            player1_id: id(p1),
            player2_id: id(p2),
            player1_score: s1,
            player2_score: s2,
            completed_at: at(seq),
        });
        self
    }

    /// `count` games in which `winner` beats `loser` 3-1.
    pub fn wins(mut self, winner: u128, loser: u128, count: usize) -> Self {
        for _ in 0..count {
            self = self.game(winner, loser, 3, 1);
        }
        self
    }

    pub fn build(self) -> Vec<CompletedMatch> {
        self.matches
    }
}

pub fn fixture(n: u128, p1: u128, p2: u128) -> PendingFixture {
    PendingFixture {
        id: Uuid::from_u128(20_000 + n),
        player1_id: id(p1),
        player2_id: id(p2),
    }
}

/// Standings row with the fields the season predictor reads.
pub fn standing(n: u128, name: &str, wins: u32, losses: u32, streak: u32) -> StandingRow {
    StandingRow {
        participant_id: id(n),
        name: name.to_string(),
        wins,
        losses,
        sets_won: 0,
        sets_lost: 0,
        set_diff: 0,
        points: wins * 2,
        current_rating: 1200.0,
        is_provisional: true,
        winning_streak: streak,
    }
}
