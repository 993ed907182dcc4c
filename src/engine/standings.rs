//! Ranked standings table built from ratings + aggregated records.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{CompletedMatch, Participant, ParticipantId, PendingFixture, RatingState, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub participant_id: ParticipantId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: i64,
    pub sets_lost: i64,
    pub set_diff: i64,
    pub points: u32,
    pub current_rating: f64,
    pub is_provisional: bool,
    pub winning_streak: u32,
}

impl StandingRow {
    fn new(participant: &Participant, rating: RatingState, record: Record) -> Self {
        Self {
            participant_id: participant.id,
            name: participant.name.clone(),
            wins: record.wins,
            losses: record.losses,
            sets_won: record.sets_won,
            sets_lost: record.sets_lost,
            set_diff: record.set_diff(),
            points: record.points(),
            current_rating: rating.rating,
            is_provisional: rating.is_provisional,
            winning_streak: record.winning_streak,
        }
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Points desc, set difference desc, name asc; id asc keeps equal names
/// totally ordered.
fn rank_order(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.set_diff.cmp(&a.set_diff))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.participant_id.cmp(&b.participant_id))
}

/// One row per participant, ranked. Participants without a rating get the
/// seed rating; participants without matches get an empty record.
pub fn compose_standings(
    participants: &[Participant],
    ratings: &HashMap<ParticipantId, RatingState>,
    records: &HashMap<ParticipantId, Record>,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = participants
        .iter()
        .map(|p| {
            StandingRow::new(
                p,
                ratings.get(&p.id).copied().unwrap_or_default(),
                records.get(&p.id).copied().unwrap_or_default(),
            )
        })
        .collect();

    rows.sort_by(rank_order);
    rows
}

/// Members of a season: participants that appear in one of its completed
/// matches or remaining fixtures. League members who sit the season out
/// are left off its table. Input order is kept.
pub fn season_participants(
    participants: &[Participant],
    matches: &[CompletedMatch],
    fixtures: &[PendingFixture],
) -> Vec<Participant> {
    let members: HashSet<ParticipantId> = matches
        .iter()
        .map(|m| (m.player1_id, m.player2_id))
        .chain(fixtures.iter().map(|f| (f.player1_id, f.player2_id)))
        .flat_map(|(a, b)| [a, b])
        .collect();

    participants
        .iter()
        .filter(|p| members.contains(&p.id))
        .cloned()
        .collect()
}
