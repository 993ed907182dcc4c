//! Season-winner forecast from current standings and remaining fixtures.
//!
//! A weighted score, not a calibrated model. The weights and clamps below
//! are part of the observable output and must not drift.

use std::collections::HashMap;

use serde::Serialize;

use super::{EngineError, ParticipantId, PendingFixture, StandingRow};

const STANDING_WEIGHT: f64 = 0.4;
const REMAINING_WEIGHT: f64 = 0.35;
const FORM_WEIGHT: f64 = 0.25;

const POINTS_PER_MATCH: f64 = 2.0;
const MAX_FORM_SCORE: f64 = 25.0;
const MIN_PROBABILITY: f64 = 5.0;
const MAX_PROBABILITY: f64 = 95.0;

/// Position gap at which an opponent counts as clearly weaker/stronger.
const SCHEDULE_GAP: i64 = 3;
const MAX_KEY_FACTORS: usize = 3;
const TOP_PREDICTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPrediction {
    pub id: ParticipantId,
    pub name: String,
    pub current_points: u32,
    pub current_position: usize,
    pub matches_remaining: usize,
    pub max_possible_points: u32,
    pub win_probability: u32,
    pub key_factors: Vec<String>,
    pub winning_streak: u32,
    pub win_percentage: u32,
    pub set_differential: i64,
}

fn standing_score(position: usize) -> f64 {
    (100.0 - (position as f64 - 1.0) * 10.0).max(0.0)
}

fn form_score(streak: u32) -> f64 {
    (streak as f64 * 5.0).min(MAX_FORM_SCORE)
}

/// Chance of winning one fixture against an opponent `position_diff`
/// places lower (negative: higher) in the table.
fn match_win_estimate(position_diff: i64) -> f64 {
    (0.5 + position_diff as f64 * 0.05).clamp(0.15, 0.85)
}

struct Schedule {
    remaining: usize,
    expected_points: f64,
    weak_opponents: usize,
    strong_opponents: usize,
}

fn schedule_for(
    id: ParticipantId,
    position: usize,
    fixtures: &[PendingFixture],
    positions: &HashMap<ParticipantId, usize>,
) -> Schedule {
    let mut schedule = Schedule {
        remaining: 0,
        expected_points: 0.0,
        weak_opponents: 0,
        strong_opponents: 0,
    };

    for opponent in fixtures.iter().filter_map(|f| f.opponent_of(id)) {
        schedule.remaining += 1;
        let estimate = match positions.get(&opponent) {
            Some(&opponent_position) => {
                let diff = opponent_position as i64 - position as i64;
                if diff >= SCHEDULE_GAP {
                    schedule.weak_opponents += 1;
                } else if diff <= -SCHEDULE_GAP {
                    schedule.strong_opponents += 1;
                }
                match_win_estimate(diff)
            }
            // Opponent outside the table: no information either way.
            None => 0.5,
        };
        schedule.expected_points += estimate * POINTS_PER_MATCH;
    }

    schedule
}

fn win_rate(row: &StandingRow) -> Option<f64> {
    match row.matches_played() {
        0 => None,
        played => Some(row.wins as f64 / played as f64),
    }
}

fn key_factors(row: &StandingRow, position: usize, schedule: &Schedule) -> Vec<String> {
    let mut factors = Vec::new();

    if position == 1 {
        factors.push("Currently leading the league".to_string());
    } else if position <= 3 {
        factors.push("In top 3 position".to_string());
    }

    match schedule.remaining {
        0 => {}
        1 => factors.push("1 match remaining".to_string()),
        n => factors.push(format!("{n} matches remaining")),
    }

    if schedule.weak_opponents > schedule.strong_opponents {
        factors.push("Favorable remaining schedule".to_string());
    }

    if row.winning_streak >= 3 {
        factors.push(format!("{}-match winning streak", row.winning_streak));
    }

    if let Some(rate) = win_rate(row) {
        if rate >= 0.8 {
            factors.push(format!("{}% win rate", (rate * 100.0).round()));
        }
    }

    factors.truncate(MAX_KEY_FACTORS);
    factors
}

fn win_probability(position: usize, streak: u32, schedule: &Schedule) -> f64 {
    let standing = standing_score(position);
    let form = form_score(streak);

    if schedule.remaining == 0 {
        return (standing * STANDING_WEIGHT + form * FORM_WEIGHT).min(MAX_PROBABILITY);
    }

    let remaining_score =
        schedule.expected_points / (schedule.remaining as f64 * POINTS_PER_MATCH) * 100.0;
    (standing * STANDING_WEIGHT + remaining_score * REMAINING_WEIGHT + form * FORM_WEIGHT)
        .clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Score every ranked participant and return the two most likely season
/// winners. `standings` must already be in rank order.
pub fn predict_season(
    standings: &[StandingRow],
    fixtures: &[PendingFixture],
) -> Result<Vec<SeasonPrediction>, EngineError> {
    if standings.len() < 2 {
        return Err(EngineError::NotEnoughParticipants(standings.len()));
    }

    let positions: HashMap<ParticipantId, usize> = standings
        .iter()
        .enumerate()
        .map(|(i, row)| (row.participant_id, i + 1))
        .collect();

    let mut scored: Vec<(f64, SeasonPrediction)> = standings
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let position = i + 1;
            let schedule = schedule_for(row.participant_id, position, fixtures, &positions);
            let probability = win_probability(position, row.winning_streak, &schedule);

            let prediction = SeasonPrediction {
                id: row.participant_id,
                name: row.name.clone(),
                current_points: row.points,
                current_position: position,
                matches_remaining: schedule.remaining,
                max_possible_points: row.points
                    + schedule.remaining as u32 * POINTS_PER_MATCH as u32,
                win_probability: probability.round() as u32,
                key_factors: key_factors(row, position, &schedule),
                winning_streak: row.winning_streak,
                win_percentage: win_rate(row)
                    .map(|r| (r * 100.0).round() as u32)
                    .unwrap_or(0),
                set_differential: row.set_diff,
            };
            (probability, prediction)
        })
        .collect();

    // Rank on the unrounded score; stable, so exact ties keep table order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    Ok(scored
        .into_iter()
        .take(TOP_PREDICTIONS)
        .map(|(_, prediction)| prediction)
        .collect())
}
