use anyhow::{Context, Result};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{MatchRow, ParticipantRow, SeasonRow};
use crate::engine::{CompletedMatch, PendingFixture};

/// Completed matches in replay order: completion time, then insertion order.
///
/// `league_id = None` reads every league (global recompute). A completed
/// row without both scores or a completion time is a data fault and fails
/// the whole read.
pub async fn completed_matches<'e, E>(
    db: E,
    league_id: Option<Uuid>,
    season_id: Option<Uuid>,
) -> Result<Vec<CompletedMatch>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT m.id, m.league_id, m.season_id,
               m.player1_id, m.player2_id,
               m.player1_score, m.player2_score,
               m.status,
               m.completed_at
          FROM matches m
         WHERE m.status = 'completed'
           AND ($1::uuid IS NULL OR m.league_id = $1)
           AND ($2::uuid IS NULL OR m.season_id = $2)
         ORDER BY m.completed_at ASC, m.seq ASC
        "#,
    )
    .bind(league_id)
    .bind(season_id)
    .fetch_all(db)
    .await
    .context("fetching completed matches")?;

    rows.into_iter()
        .map(|row| {
            let m = CompletedMatch::try_from(row)?;
            if m.is_tied() {
                log::warn!(
                    "completed match {} has equal scores ({}-{}); counting it as a player2 win",
                    m.id,
                    m.player1_score,
                    m.player2_score
                );
            }
            Ok(m)
        })
        .collect()
}

/// Scheduled and in-progress matches of a season.
pub async fn pending_fixtures(db: &PgPool, season_id: Uuid) -> Result<Vec<PendingFixture>> {
    let rows = sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT m.id, m.league_id, m.season_id,
               m.player1_id, m.player2_id,
               m.player1_score, m.player2_score,
               m.status, m.completed_at
          FROM matches m
         WHERE m.season_id = $1
           AND m.status IN ('scheduled', 'in_progress')
         ORDER BY m.scheduled_at NULLS LAST, m.seq
        "#,
    )
    .bind(season_id)
    .fetch_all(db)
    .await
    .context("fetching pending fixtures")?;

    Ok(rows.into_iter().map(PendingFixture::from).collect())
}

/// The league's active season, newest first if several are flagged.
pub async fn active_season(db: &PgPool, league_id: Uuid) -> Result<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        SELECT id, league_id, name, is_active
          FROM seasons
         WHERE league_id = $1 AND is_active
         ORDER BY starts_at DESC NULLS LAST, created_at DESC
         LIMIT 1
        "#,
    )
    .bind(league_id)
    .fetch_optional(db)
    .await
    .context("fetching active season")
}

/// Does `season_id` belong to `league_id`?
pub async fn season_in_league(db: &PgPool, league_id: Uuid, season_id: Uuid) -> Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM seasons WHERE id = $1 AND league_id = $2)",
    )
    .bind(season_id)
    .bind(league_id)
    .fetch_one(db)
    .await
    .context("checking season membership")
}

pub async fn participants(db: &PgPool, league_id: Uuid) -> Result<Vec<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(
        r#"
        SELECT id, league_id, name, email
          FROM participants
         WHERE league_id = $1
         ORDER BY name, id
        "#,
    )
    .bind(league_id)
    .fetch_all(db)
    .await
    .context("fetching league participants")
}
