//! Full-history rating recompute.
//!
//! Lock → load → replay → replace → commit, all or nothing. The rating
//! store is a port so the flow runs the same against Postgres and against
//! in-memory fakes.

use serde::Serialize;
use uuid::Uuid;

use crate::engine::{replay_ratings, CompletedMatch, ParticipantId, RatingPolicy, RatingState};

/// Which slice of the rating store a recompute owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeScope {
    League(Uuid),
    AllLeagues,
}

impl RecomputeScope {
    pub fn league_id(&self) -> Option<Uuid> {
        match self {
            RecomputeScope::League(id) => Some(*id),
            RecomputeScope::AllLeagues => None,
        }
    }
}

impl std::fmt::Display for RecomputeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecomputeScope::League(id) => write!(f, "league {id}"),
            RecomputeScope::AllLeagues => write!(f, "all leagues"),
        }
    }
}

/// One recompute's exclusive hold on the rating store.
///
/// History is read and ratings are written inside the session, so a
/// concurrent recompute can never commit ratings replayed from older
/// history. Nothing becomes visible until `commit`; dropping the session
/// discards it.
#[async_trait::async_trait]
pub trait RecomputeSession: Send {
    /// Completed matches of `scope` in replay order.
    async fn completed_matches(
        &mut self,
        scope: RecomputeScope,
    ) -> anyhow::Result<Vec<CompletedMatch>>;

    /// Afterwards the scope holds exactly `ratings`.
    async fn replace_ratings(
        &mut self,
        scope: RecomputeScope,
        ratings: &[(ParticipantId, RatingState)],
    ) -> anyhow::Result<()>;

    async fn commit(self) -> anyhow::Result<()>;
}

/// Rating persistence. Sessions of one store are serialized.
#[async_trait::async_trait]
pub trait RatingStore: Sync {
    type Session: RecomputeSession;

    async fn begin_recompute(&self) -> anyhow::Result<Self::Session>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecomputeReport {
    pub participants_updated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecomputeReport {
    fn failed(err: anyhow::Error) -> Self {
        Self {
            participants_updated: 0,
            error: Some(format!("{err:#}")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Replay `matches` and return rows sorted by participant id, so writes
/// happen in a stable order.
pub fn compute_rating_rows(
    matches: &[CompletedMatch],
    policy: &RatingPolicy,
) -> Vec<(ParticipantId, RatingState)> {
    let mut rows: Vec<(ParticipantId, RatingState)> =
        replay_ratings(matches, policy).into_iter().collect();
    rows.sort_by_key(|(id, _)| *id);
    rows
}

/// Rebuild every rating in `scope` from its completed-match history.
pub async fn recompute_ratings<S>(
    store: &S,
    scope: RecomputeScope,
    policy: &RatingPolicy,
) -> RecomputeReport
where
    S: RatingStore,
{
    log::info!("rating recompute started for {scope}");

    let mut session = match store.begin_recompute().await {
        Ok(session) => session,
        Err(e) => {
            log::error!("rating recompute for {scope} could not start: {e:?}");
            return RecomputeReport::failed(e.context("starting recompute"));
        }
    };

    let matches = match session.completed_matches(scope).await {
        Ok(matches) => matches,
        Err(e) => {
            log::error!("rating recompute for {scope} aborted, history unavailable: {e:?}");
            return RecomputeReport::failed(e.context("loading match history"));
        }
    };

    let rows = compute_rating_rows(&matches, policy);

    let written = session.replace_ratings(scope, &rows).await;
    let written = match written {
        Ok(()) => session.commit().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        log::error!("rating recompute for {scope} failed to persist: {e:?}");
        return RecomputeReport::failed(e.context("persisting ratings"));
    }

    log::info!(
        "rating recompute for {scope} replayed {} matches, updated {} participants",
        matches.len(),
        rows.len()
    );
    RecomputeReport {
        participants_updated: rows.len(),
        error: None,
    }
}
