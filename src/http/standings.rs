//! League / season standings table.

use std::collections::HashMap;

use actix_web::{get, web, HttpResponse, Responder};
use anyhow::Result;
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache;
use crate::config::settings;
use crate::db::{match_repo, rating_repo};
use crate::engine::{
    aggregate_records, compose_standings, season_participants, Participant, PendingFixture,
    RatingState, StandingRow,
};
use crate::http::internal_error;

#[derive(Deserialize)]
pub struct StandingsParams {
    /// Restrict records to one season; ratings stay league-wide.
    pub season_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingRow>,
    pub total: usize,
}

/// A ranked table and the fixtures still to be played in it.
pub struct StandingsTable {
    pub standings: Vec<StandingRow>,
    /// Remaining season fixtures; empty for a league-wide table.
    pub fixtures: Vec<PendingFixture>,
}

/// Ranked standings of a league, or of one season of it.
///
/// A league-wide table lists every participant. A season table lists only
/// the participants with a completed match or a fixture in that season.
/// Records come from completed matches in scope, ratings from the rating
/// store; unrated participants show the seed rating.
pub async fn load_standings(
    db: &PgPool,
    league_id: Uuid,
    season_id: Option<Uuid>,
) -> Result<StandingsTable> {
    let league: Vec<Participant> = match_repo::participants(db, league_id)
        .await?
        .into_iter()
        .map(Participant::from)
        .collect();
    let matches = match_repo::completed_matches(db, Some(league_id), season_id).await?;
    let (participants, fixtures) = match season_id {
        Some(season_id) => {
            let fixtures = match_repo::pending_fixtures(db, season_id).await?;
            (season_participants(&league, &matches, &fixtures), fixtures)
        }
        None => (league, Vec::new()),
    };
    let ratings: HashMap<Uuid, RatingState> = rating_repo::ratings_for_league(db, league_id)
        .await?
        .iter()
        .map(|row| (row.participant_id, RatingState::from(row)))
        .collect();

    let records = aggregate_records(&matches);
    Ok(StandingsTable {
        standings: compose_standings(&participants, &ratings, &records),
        fixtures,
    })
}

/// GET /api/leagues/{league_id}/standings?season_id=
#[get("/leagues/{league_id}/standings")]
pub async fn standings(
    path: web::Path<Uuid>,
    web::Query(params): web::Query<StandingsParams>,
    db: web::Data<PgPool>,
    redis: web::Data<RedisClient>,
) -> impl Responder {
    let league_id = path.into_inner();

    if let Some(season_id) = params.season_id {
        match match_repo::season_in_league(&db, league_id, season_id).await {
            Ok(true) => {}
            Ok(false) => return HttpResponse::NotFound().body("season not in league"),
            Err(e) => return internal_error("could not load season", e),
        }
    }

    // 1) Cached table
    let key = cache::standings_key(league_id, params.season_id);
    if let Some(cached) = cache::get_standings(&redis, &key).await {
        return HttpResponse::Ok()
            .content_type("application/json")
            .body(cached);
    }

    // 2) Compute from history
    let rows = match load_standings(&db, league_id, params.season_id).await {
        Ok(table) => table.standings,
        Err(e) => return internal_error("could not compute standings", e),
    };
    let response = StandingsResponse {
        total: rows.len(),
        standings: rows,
    };

    // 3) Serialize, cache, return
    let body = match serde_json::to_string(&response) {
        Ok(b) => b,
        Err(e) => return internal_error("serialization error", e.into()),
    };
    cache::put_standings(&redis, &key, &body, settings().standings_cache_ttl).await;

    HttpResponse::Ok()
        .content_type("application/json")
        .body(body)
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(standings);
}
