use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::engine::{CompletedMatch, Participant, PendingFixture, RatingState};

/// Match life-cycle. Only `Completed` feeds the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    /// Ownership marker set by claim approval; not used by the engine.
    pub email: Option<String>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Participant {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SeasonRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub season_id: Option<Uuid>,
    pub player1_id: Uuid,
    pub player2_id: Uuid,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub status: MatchStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<MatchRow> for CompletedMatch {
    type Error = anyhow::Error;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        if row.status != MatchStatus::Completed {
            bail!("match {} is {:?}, not completed", row.id, row.status);
        }
        let (Some(player1_score), Some(player2_score)) = (row.player1_score, row.player2_score)
        else {
            bail!("completed match {} is missing a score", row.id);
        };
        let completed_at = row
            .completed_at
            .ok_or_else(|| anyhow!("completed match {} has no completion time", row.id))?;

        Ok(CompletedMatch {
            id: row.id,
            player1_id: row.player1_id,
            player2_id: row.player2_id,
            player1_score,
            player2_score,
            completed_at,
        })
    }
}

impl From<MatchRow> for PendingFixture {
    fn from(row: MatchRow) -> Self {
        PendingFixture {
            id: row.id,
            player1_id: row.player1_id,
            player2_id: row.player2_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RatingRow {
    pub participant_id: Uuid,
    pub current_rating: f64,
    pub matches_played: i32,
    pub is_provisional: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&RatingRow> for RatingState {
    fn from(row: &RatingRow) -> Self {
        RatingState {
            rating: row.current_rating,
            matches_played: row.matches_played.max(0) as u32,
            is_provisional: row.is_provisional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn completed_row() -> MatchRow {
        MatchRow {
            id: Uuid::from_u128(1),
            league_id: Uuid::from_u128(100),
            season_id: None,
            player1_id: Uuid::from_u128(2),
            player2_id: Uuid::from_u128(3),
            player1_score: Some(3),
            player2_score: Some(1),
            status: MatchStatus::Completed,
            completed_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()),
        }
    }

    #[test]
    fn completed_row_converts() {
        let m = CompletedMatch::try_from(completed_row()).unwrap();
        assert_eq!((m.player1_score, m.player2_score), (3, 1));
        assert!(m.player1_won());
    }

    #[test]
    fn missing_completion_time_is_rejected() {
        let row = MatchRow {
            completed_at: None,
            ..completed_row()
        };
        let err = CompletedMatch::try_from(row).unwrap_err();
        assert!(err.to_string().contains("no completion time"));
    }

    #[test]
    fn missing_score_is_rejected() {
        let row = MatchRow {
            player2_score: None,
            ..completed_row()
        };
        let err = CompletedMatch::try_from(row).unwrap_err();
        assert!(err.to_string().contains("missing a score"));
    }

    #[test]
    fn unfinished_match_is_not_history() {
        let row = MatchRow {
            status: MatchStatus::InProgress,
            ..completed_row()
        };
        assert!(CompletedMatch::try_from(row).is_err());
    }
}
