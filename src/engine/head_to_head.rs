//! Head-to-head win probability from raw win/loss records.
//!
//! Deliberately ignores ratings: with enough direct meetings the split is
//! the direct win share, otherwise it is inferred from how both sides did
//! against shared opponents.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::{CompletedMatch, EngineError, Participant, ParticipantId};

/// Direct meetings needed before the direct record is trusted.
const MIN_DIRECT_MATCHES: u32 = 3;
const HIGH_CONFIDENCE_DIRECT_MATCHES: u32 = 5;
const MEDIUM_CONFIDENCE_COMMON_OPPONENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    DirectMatches,
    CommonOpponents,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    fn games(&self) -> u32 {
        self.wins + self.losses
    }

    fn push(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectRecord {
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub total_matches: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonOpponent {
    pub id: ParticipantId,
    pub name: String,
    pub player1_record: WinLoss,
    pub player2_record: WinLoss,
}

/// Percent split; the two chances always add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Probability {
    pub player1_chance: u32,
    pub player2_chance: u32,
    pub confidence: Confidence,
    pub basis: Basis,
}

impl Probability {
    fn split(player1_share: f64, confidence: Confidence, basis: Basis) -> Self {
        let player1_chance = (player1_share * 100.0).round().clamp(0.0, 100.0) as u32;
        Self {
            player1_chance,
            player2_chance: 100 - player1_chance,
            confidence,
            basis,
        }
    }

    fn even() -> Self {
        Self {
            player1_chance: 50,
            player2_chance: 50,
            confidence: Confidence::Low,
            basis: Basis::InsufficientData,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub player1: Participant,
    pub player2: Participant,
    pub direct_matches: DirectRecord,
    pub common_opponents: Vec<CommonOpponent>,
    pub probability: Probability,
}

fn direct_record(
    player1: ParticipantId,
    player2: ParticipantId,
    matches: &[CompletedMatch],
) -> DirectRecord {
    let mut record = DirectRecord::default();
    for m in matches {
        if m.opponent_of(player1) != Some(player2) {
            continue;
        }
        record.total_matches += 1;
        if m.winner() == player1 {
            record.player1_wins += 1;
        } else {
            record.player2_wins += 1;
        }
    }
    record
}

/// Per-opponent record of `player`, excluding games against `excluded`.
fn records_by_opponent(
    player: ParticipantId,
    excluded: ParticipantId,
    matches: &[CompletedMatch],
) -> BTreeMap<ParticipantId, WinLoss> {
    let mut by_opponent = BTreeMap::new();
    for m in matches {
        let Some(opponent) = m.opponent_of(player) else {
            continue;
        };
        if opponent == excluded || opponent == player {
            continue;
        }
        by_opponent
            .entry(opponent)
            .or_insert_with(WinLoss::default)
            .push(m.winner() == player);
    }
    by_opponent
}

fn common_opponents(
    player1: ParticipantId,
    player2: ParticipantId,
    matches: &[CompletedMatch],
    names: &HashMap<ParticipantId, String>,
) -> Vec<CommonOpponent> {
    let records1 = records_by_opponent(player1, player2, matches);
    let records2 = records_by_opponent(player2, player1, matches);

    let mut common: Vec<CommonOpponent> = records1
        .iter()
        .filter_map(|(id, record1)| {
            records2.get(id).map(|record2| CommonOpponent {
                id: *id,
                name: names.get(id).cloned().unwrap_or_default(),
                player1_record: *record1,
                player2_record: *record2,
            })
        })
        .collect();

    common.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    common
}

fn common_opponent_probability(common: &[CommonOpponent]) -> Option<Probability> {
    let (total1, total2) = common.iter().fold(
        (WinLoss::default(), WinLoss::default()),
        |(mut t1, mut t2), c| {
            t1.wins += c.player1_record.wins;
            t1.losses += c.player1_record.losses;
            t2.wins += c.player2_record.wins;
            t2.losses += c.player2_record.losses;
            (t1, t2)
        },
    );
    if total1.games() == 0 || total2.games() == 0 {
        return None;
    }

    let win_rate1 = total1.wins as f64 / total1.games() as f64;
    let win_rate2 = total2.wins as f64 / total2.games() as f64;
    let denominator = win_rate1 + win_rate2;
    if denominator <= 0.0 {
        return None;
    }

    let confidence = if common.len() >= MEDIUM_CONFIDENCE_COMMON_OPPONENTS {
        Confidence::Medium
    } else {
        Confidence::Low
    };
    Some(Probability::split(
        win_rate1 / denominator,
        confidence,
        Basis::CommonOpponents,
    ))
}

/// Estimate how a meeting between `player1` and `player2` would go.
///
/// `names` resolves common-opponent ids for display; unknown ids get an
/// empty name.
pub fn head_to_head(
    player1: &Participant,
    player2: &Participant,
    matches: &[CompletedMatch],
    names: &HashMap<ParticipantId, String>,
) -> Result<HeadToHead, EngineError> {
    if player1.id == player2.id {
        return Err(EngineError::SameParticipant);
    }

    let direct = direct_record(player1.id, player2.id, matches);
    let common = common_opponents(player1.id, player2.id, matches, names);

    let probability = if direct.total_matches >= MIN_DIRECT_MATCHES {
        let confidence = if direct.total_matches >= HIGH_CONFIDENCE_DIRECT_MATCHES {
            Confidence::High
        } else {
            Confidence::Medium
        };
        Probability::split(
            direct.player1_wins as f64 / direct.total_matches as f64,
            confidence,
            Basis::DirectMatches,
        )
    } else {
        common_opponent_probability(&common).unwrap_or_else(Probability::even)
    };

    Ok(HeadToHead {
        player1: player1.clone(),
        player2: player2.clone(),
        direct_matches: direct,
        common_opponents: common,
        probability,
    })
}
