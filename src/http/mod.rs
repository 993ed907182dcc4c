//! HTTP surface of the rating & prediction engine.

use actix_web::HttpResponse;

use crate::engine::EngineError;

pub mod admin;
pub mod auth;
pub mod head_to_head;
pub mod health;
pub mod predictions;
pub mod ratings;
pub mod routes;
pub mod standings;

/// Log the full error chain, hand the client a short reason.
pub(crate) fn internal_error(what: &str, err: anyhow::Error) -> HttpResponse {
    log::error!("{what}: {err:?}");
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": what }))
}

/// Rejected input, before any computation.
pub(crate) fn engine_error(err: EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        EngineError::UnknownParticipant(_) => HttpResponse::NotFound().json(body),
        EngineError::SameParticipant | EngineError::NotEnoughParticipants(_) => {
            HttpResponse::BadRequest().json(body)
        }
    }
}
