//! Stored rating rows of a league (display only; never replay input).

use actix_web::{get, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::rating_repo;
use crate::http::internal_error;

/// GET /api/leagues/{league_id}/ratings
#[get("/leagues/{league_id}/ratings")]
pub async fn ratings(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    match rating_repo::ratings_for_league(&db, path.into_inner()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => internal_error("could not load ratings", e),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ratings);
}
