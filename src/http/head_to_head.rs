//! Head-to-head win probability between two participants of a league.

use std::collections::HashMap;

use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::match_repo;
use crate::engine::{head_to_head as estimate, EngineError, Participant};
use crate::http::{engine_error, internal_error};

#[derive(Deserialize)]
pub struct HeadToHeadParams {
    pub player1: Uuid,
    pub player2: Uuid,
}

/// GET /api/leagues/{league_id}/head-to-head?player1=&player2=
#[get("/leagues/{league_id}/head-to-head")]
pub async fn head_to_head(
    path: web::Path<Uuid>,
    web::Query(params): web::Query<HeadToHeadParams>,
    db: web::Data<PgPool>,
) -> impl Responder {
    let league_id = path.into_inner();
    if params.player1 == params.player2 {
        return engine_error(EngineError::SameParticipant);
    }

    let participants = match match_repo::participants(&db, league_id).await {
        Ok(rows) => rows,
        Err(e) => return internal_error("could not load participants", e),
    };
    let names: HashMap<Uuid, String> = participants
        .iter()
        .map(|p| (p.id, p.name.clone()))
        .collect();
    let lookup = |id: Uuid| {
        names
            .get(&id)
            .map(|name| Participant {
                id,
                name: name.clone(),
            })
            .ok_or(EngineError::UnknownParticipant(id))
    };
    let (player1, player2) = match (lookup(params.player1), lookup(params.player2)) {
        (Ok(p1), Ok(p2)) => (p1, p2),
        (Err(e), _) | (_, Err(e)) => return engine_error(e),
    };

    let matches = match match_repo::completed_matches(db.get_ref(), Some(league_id), None).await {
        Ok(m) => m,
        Err(e) => return internal_error("could not load match history", e),
    };

    match estimate(&player1, &player2, &matches, &names) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => engine_error(e),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(head_to_head);
}
