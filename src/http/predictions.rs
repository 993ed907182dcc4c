//! Season-winner forecast for a league's active season.

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::match_repo;
use crate::engine::{predict_season, SeasonPrediction};
use crate::http::standings::{load_standings, StandingsTable};
use crate::http::{engine_error, internal_error};

#[derive(Serialize)]
pub struct PredictionsResponse {
    pub season_id: Option<Uuid>,
    pub predictions: Vec<SeasonPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/leagues/{league_id}/predictions
#[get("/leagues/{league_id}/predictions")]
pub async fn predictions(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    let league_id = path.into_inner();

    let season = match match_repo::active_season(&db, league_id).await {
        Ok(Some(season)) => season,
        Ok(None) => {
            return HttpResponse::Ok().json(PredictionsResponse {
                season_id: None,
                predictions: Vec::new(),
                message: Some("No active season".to_string()),
            })
        }
        Err(e) => return internal_error("could not load active season", e),
    };

    let StandingsTable {
        standings,
        fixtures,
    } = match load_standings(&db, league_id, Some(season.id)).await {
        Ok(table) => table,
        Err(e) => return internal_error("could not compute standings", e),
    };

    let message = if standings.iter().all(|row| row.matches_played() == 0) {
        Some("No completed matches yet; forecast is based on the schedule only".to_string())
    } else {
        None
    };

    match predict_season(&standings, &fixtures) {
        Ok(predictions) => HttpResponse::Ok().json(PredictionsResponse {
            season_id: Some(season.id),
            predictions,
            message,
        }),
        Err(e) => engine_error(e),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(predictions);
}
