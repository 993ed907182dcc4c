//! Full recompute flow against an in-memory rating store.

mod common;

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use common::{id, History};
use league_server::engine::{CompletedMatch, ParticipantId, RatingPolicy, RatingState};
use league_server::recompute::{
    compute_rating_rows, recompute_ratings, RatingStore, RecomputeReport, RecomputeScope,
    RecomputeSession,
};

type Rows = Vec<(ParticipantId, RatingState)>;

#[derive(Default)]
struct Committed {
    rows: Rows,
    events: Vec<&'static str>,
}

/// Staged writes become visible only on commit.
#[derive(Default)]
struct FakeStore {
    history: Option<Vec<CompletedMatch>>,
    fail_write: bool,
    fail_begin: bool,
    state: Arc<Mutex<Committed>>,
}

struct FakeSession {
    history: Option<Vec<CompletedMatch>>,
    fail_write: bool,
    staged: Option<Rows>,
    state: Arc<Mutex<Committed>>,
}

impl FakeSession {
    fn log(&self, event: &'static str) {
        self.state.lock().unwrap().events.push(event);
    }
}

#[async_trait::async_trait]
impl RatingStore for FakeStore {
    type Session = FakeSession;

    async fn begin_recompute(&self) -> anyhow::Result<FakeSession> {
        if self.fail_begin {
            return Err(anyhow!("pool timed out"));
        }
        self.state.lock().unwrap().events.push("begin");
        Ok(FakeSession {
            history: self.history.clone(),
            fail_write: self.fail_write,
            staged: None,
            state: Arc::clone(&self.state),
        })
    }
}

#[async_trait::async_trait]
impl RecomputeSession for FakeSession {
    async fn completed_matches(
        &mut self,
        _scope: RecomputeScope,
    ) -> anyhow::Result<Vec<CompletedMatch>> {
        self.log("read");
        self.history
            .clone()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    async fn replace_ratings(
        &mut self,
        _scope: RecomputeScope,
        ratings: &[(ParticipantId, RatingState)],
    ) -> anyhow::Result<()> {
        self.log("write");
        if self.fail_write {
            return Err(anyhow!("deadlock detected"));
        }
        self.staged = Some(ratings.to_vec());
        Ok(())
    }

    async fn commit(mut self) -> anyhow::Result<()> {
        self.log("commit");
        if let Some(rows) = self.staged.take() {
            self.state.lock().unwrap().rows = rows;
        }
        Ok(())
    }
}

impl FakeStore {
    fn with(history: Option<Vec<CompletedMatch>>, rows: Rows) -> Self {
        Self {
            history,
            state: Arc::new(Mutex::new(Committed {
                rows,
                events: Vec::new(),
            })),
            ..Self::default()
        }
    }

    fn rows(&self) -> Rows {
        self.state.lock().unwrap().rows.clone()
    }

    fn events(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().events.clone()
    }
}

fn sample_history() -> Vec<CompletedMatch> {
    History::new()
        .wins(1, 2, 3)
        .game(2, 3, 3, 2)
        .game(3, 1, 1, 3)
        .build()
}

fn stale_rows() -> Rows {
    vec![(
        id(1),
        RatingState {
            rating: 1500.0,
            matches_played: 40,
            is_provisional: false,
        },
    )]
}

#[tokio::test]
async fn recompute_replaces_every_rating() {
    let store = FakeStore::with(Some(sample_history()), stale_rows());
    let policy = RatingPolicy::default();

    let report = recompute_ratings(&store, RecomputeScope::League(id(99)), &policy).await;

    assert!(report.is_success());
    assert_eq!(report.participants_updated, 3);
    let rows = store.rows();
    assert_eq!(rows, compute_rating_rows(&sample_history(), &policy));
    assert!(rows.windows(2).all(|w| w[0].0 < w[1].0));
}

#[tokio::test]
async fn history_is_read_inside_the_session() {
    let store = FakeStore::with(Some(sample_history()), Vec::new());

    recompute_ratings(&store, RecomputeScope::AllLeagues, &RatingPolicy::default()).await;

    assert_eq!(store.events(), ["begin", "read", "write", "commit"]);
}

#[tokio::test]
async fn repeated_recompute_yields_identical_ratings() {
    let store = FakeStore::with(Some(sample_history()), Vec::new());
    let policy = RatingPolicy::default();

    recompute_ratings(&store, RecomputeScope::AllLeagues, &policy).await;
    let first = store.rows();
    recompute_ratings(&store, RecomputeScope::AllLeagues, &policy).await;
    let second = store.rows();

    assert_eq!(first, second);
    assert_eq!(store.events().iter().filter(|e| **e == "commit").count(), 2);
}

#[tokio::test]
async fn unreadable_history_aborts_before_any_write() {
    let store = FakeStore::with(None, stale_rows());

    let report =
        recompute_ratings(&store, RecomputeScope::AllLeagues, &RatingPolicy::default()).await;

    assert_eq!(report.participants_updated, 0);
    let error = report.error.expect("error reported");
    assert!(error.contains("loading match history"));
    assert!(error.contains("connection refused"));
    assert_eq!(store.events(), ["begin", "read"]);
    assert_eq!(store.rows(), stale_rows());
}

#[tokio::test]
async fn failed_write_is_never_committed() {
    let store = FakeStore {
        fail_write: true,
        ..FakeStore::with(Some(sample_history()), stale_rows())
    };

    let report =
        recompute_ratings(&store, RecomputeScope::League(id(7)), &RatingPolicy::default()).await;

    assert_eq!(report.participants_updated, 0);
    assert!(report.error.unwrap().contains("persisting ratings"));
    assert!(!store.events().contains(&"commit"));
    assert_eq!(store.rows(), stale_rows());
}

#[tokio::test]
async fn unavailable_store_reports_start_failure() {
    let store = FakeStore {
        fail_begin: true,
        ..FakeStore::with(Some(sample_history()), stale_rows())
    };

    let report =
        recompute_ratings(&store, RecomputeScope::AllLeagues, &RatingPolicy::default()).await;

    assert_eq!(report.participants_updated, 0);
    let error = report.error.unwrap();
    assert!(error.contains("starting recompute"));
    assert!(error.contains("pool timed out"));
    assert_eq!(store.rows(), stale_rows());
}

#[tokio::test]
async fn empty_history_clears_the_scope() {
    let store = FakeStore::with(Some(Vec::new()), stale_rows());

    let report =
        recompute_ratings(&store, RecomputeScope::League(id(7)), &RatingPolicy::default()).await;

    assert!(report.is_success());
    assert_eq!(report.participants_updated, 0);
    assert!(store.rows().is_empty());
}

#[test]
fn report_omits_error_on_success() {
    let ok = RecomputeReport {
        participants_updated: 3,
        error: None,
    };
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json, serde_json::json!({ "participants_updated": 3 }));
}

#[test]
fn scope_exposes_league_filter() {
    assert_eq!(RecomputeScope::League(id(5)).league_id(), Some(id(5)));
    assert_eq!(RecomputeScope::AllLeagues.league_id(), None);
}
