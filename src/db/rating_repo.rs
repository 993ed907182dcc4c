use anyhow::{Context, Result};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::match_repo;
use crate::db::models::RatingRow;
use crate::engine::{CompletedMatch, ParticipantId, RatingState};
use crate::recompute::{RatingStore, RecomputeScope, RecomputeSession};

/// Serializes concurrent recomputes (`pg_advisory_xact_lock` key).
const RECOMPUTE_LOCK_KEY: i64 = 0x6c65_6167_7565;

/// Stored ratings of a league, for display.
pub async fn ratings_for_league(db: &PgPool, league_id: Uuid) -> Result<Vec<RatingRow>> {
    sqlx::query_as::<_, RatingRow>(
        r#"
        SELECT r.participant_id, r.current_rating, r.matches_played,
               r.is_provisional, r.updated_at
          FROM ratings r
          JOIN participants p ON p.id = r.participant_id
         WHERE p.league_id = $1
         ORDER BY r.current_rating DESC, r.participant_id
        "#,
    )
    .bind(league_id)
    .fetch_all(db)
    .await
    .context("fetching league ratings")
}

/// Swap the scope's rating rows for `ratings` on the session's
/// transaction. Rows of participants absent from `ratings` are removed.
async fn write_ratings(
    conn: &mut PgConnection,
    league_id: Option<Uuid>,
    ratings: &[(ParticipantId, RatingState)],
) -> Result<()> {
    let ids: Vec<Uuid> = ratings.iter().map(|(id, _)| *id).collect();
    let values: Vec<f64> = ratings.iter().map(|(_, r)| r.rating).collect();
    let played: Vec<i32> = ratings
        .iter()
        .map(|(_, r)| i32::try_from(r.matches_played).unwrap_or(i32::MAX))
        .collect();
    let provisional: Vec<bool> = ratings.iter().map(|(_, r)| r.is_provisional).collect();

    sqlx::query(
        r#"
        DELETE FROM ratings
         WHERE $1::uuid IS NULL
            OR participant_id IN (SELECT id FROM participants WHERE league_id = $1)
        "#,
    )
    .bind(league_id)
    .execute(&mut *conn)
    .await
    .context("clearing previous ratings")?;

    sqlx::query(
        r#"
        INSERT INTO ratings (participant_id, current_rating, matches_played,
                             is_provisional, updated_at)
        SELECT t.participant_id, t.current_rating, t.matches_played,
               t.is_provisional, NOW()
          FROM UNNEST($1::uuid[], $2::float8[], $3::int4[], $4::bool[])
            AS t(participant_id, current_rating, matches_played, is_provisional)
        ON CONFLICT (participant_id) DO UPDATE
           SET current_rating = EXCLUDED.current_rating,
               matches_played = EXCLUDED.matches_played,
               is_provisional = EXCLUDED.is_provisional,
               updated_at     = EXCLUDED.updated_at
        "#,
    )
    .bind(ids)
    .bind(values)
    .bind(played)
    .bind(provisional)
    .execute(&mut *conn)
    .await
    .context("writing recomputed ratings")?;

    Ok(())
}

/// Recompute transaction. The advisory lock is taken before history is
/// read and held until commit or rollback, so recomputes run one at a time
/// and each replays the history committed before it started. Readers see
/// either the previous rating set or the new one.
pub struct PgRecompute {
    tx: Transaction<'static, Postgres>,
}

#[async_trait::async_trait]
impl RatingStore for PgPool {
    type Session = PgRecompute;

    async fn begin_recompute(&self) -> Result<PgRecompute> {
        let mut tx = self.begin().await.context("starting rating transaction")?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(RECOMPUTE_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .context("acquiring recompute lock")?;

        Ok(PgRecompute { tx })
    }
}

#[async_trait::async_trait]
impl RecomputeSession for PgRecompute {
    async fn completed_matches(&mut self, scope: RecomputeScope) -> Result<Vec<CompletedMatch>> {
        match_repo::completed_matches(&mut *self.tx, scope.league_id(), None).await
    }

    async fn replace_ratings(
        &mut self,
        scope: RecomputeScope,
        ratings: &[(ParticipantId, RatingState)],
    ) -> Result<()> {
        write_ratings(&mut self.tx, scope.league_id(), ratings).await
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await.context("committing ratings")
    }
}
