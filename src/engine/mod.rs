//! Rating & match-outcome prediction engine.
//!
//! Everything in here is a pure function over match data already loaded
//! into memory: no database handles, no async. The recompute flow in
//! [`crate::recompute`] and the HTTP handlers feed it rows and persist or
//! serialize what comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod head_to_head;
pub mod rating;
pub mod record;
pub mod season;
pub mod standings;

pub use head_to_head::{head_to_head, Basis, Confidence, HeadToHead};
pub use rating::{replay_ratings, RatingPolicy, RatingState, INITIAL_RATING};
pub use record::{aggregate_records, Record};
pub use season::{predict_season, SeasonPrediction};
pub use standings::{compose_standings, season_participants, StandingRow};

pub type ParticipantId = Uuid;

/// Identity of a participant inside one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

/// One completed match, the unit every reducer consumes.
///
/// Slices of these are expected in replay order (completion time, then
/// insertion order), which is what the match history reader returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMatch {
    pub id: Uuid,
    pub player1_id: ParticipantId,
    pub player2_id: ParticipantId,
    pub player1_score: i32,
    pub player2_score: i32,
    pub completed_at: DateTime<Utc>,
}

impl CompletedMatch {
    /// Draws are not modeled: equal scores count as a player2 win.
    pub fn player1_won(&self) -> bool {
        self.player1_score > self.player2_score
    }

    pub fn is_tied(&self) -> bool {
        self.player1_score == self.player2_score
    }

    pub fn winner(&self) -> ParticipantId {
        if self.player1_won() {
            self.player1_id
        } else {
            self.player2_id
        }
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.player1_id == id || self.player2_id == id
    }

    /// The other side of the match, if `id` played in it.
    pub fn opponent_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        if self.player1_id == id {
            Some(self.player2_id)
        } else if self.player2_id == id {
            Some(self.player1_id)
        } else {
            None
        }
    }

    /// `(own score, opponent score)` from the point of view of `id`.
    pub fn scores_for(&self, id: ParticipantId) -> Option<(i32, i32)> {
        if self.player1_id == id {
            Some((self.player1_score, self.player2_score))
        } else if self.player2_id == id {
            Some((self.player2_score, self.player1_score))
        } else {
            None
        }
    }
}

/// A scheduled or in-progress match that still counts toward the season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFixture {
    pub id: Uuid,
    pub player1_id: ParticipantId,
    pub player2_id: ParticipantId,
}

impl PendingFixture {
    pub fn opponent_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        if self.player1_id == id {
            Some(self.player2_id)
        } else if self.player2_id == id {
            Some(self.player1_id)
        } else {
            None
        }
    }
}

/// Inputs the engine rejects before doing any work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("head-to-head requires two distinct participants")]
    SameParticipant,
    #[error("season prediction requires at least two ranked participants, got {0}")]
    NotEnoughParticipants(usize),
    #[error("participant {0} does not belong to this league")]
    UnknownParticipant(ParticipantId),
}
