//! Win/loss, set totals and current winning streak per participant.

use std::collections::HashMap;

use serde::Serialize;

use super::{CompletedMatch, ParticipantId};

/// League points awarded per win. Losses earn nothing.
pub const POINTS_PER_WIN: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    /// Sum of own scores across completed matches.
    pub sets_won: i64,
    /// Sum of opponent scores.
    pub sets_lost: i64,
    /// Consecutive most-recent wins, zero after a loss.
    pub winning_streak: u32,
}

impl Record {
    pub fn set_diff(&self) -> i64 {
        self.sets_won - self.sets_lost
    }

    pub fn points(&self) -> u32 {
        self.wins * POINTS_PER_WIN
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Whole-number win percentage, 0 when nothing has been played.
    pub fn win_percentage(&self) -> u32 {
        match self.matches_played() {
            0 => 0,
            played => (self.wins as f64 / played as f64 * 100.0).round() as u32,
        }
    }

    fn push(&mut self, won: bool, own: i32, other: i32) {
        self.sets_won += own as i64;
        self.sets_lost += other as i64;
        if won {
            self.wins += 1;
            self.winning_streak += 1;
        } else {
            self.losses += 1;
            self.winning_streak = 0;
        }
    }
}

/// Fold the ordered match list into a fresh record per participant.
pub fn aggregate_records(matches: &[CompletedMatch]) -> HashMap<ParticipantId, Record> {
    let mut records: HashMap<ParticipantId, Record> = HashMap::new();

    for m in matches {
        let player1_won = m.player1_won();
        records.entry(m.player1_id).or_default().push(
            player1_won,
            m.player1_score,
            m.player2_score,
        );
        records.entry(m.player2_id).or_default().push(
            !player1_won,
            m.player2_score,
            m.player1_score,
        );
    }

    records
}
