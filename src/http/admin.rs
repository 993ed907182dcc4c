//! Admin-triggered full rating recompute.

use actix_web::{post, web, HttpResponse, Responder};
use redis::Client as RedisClient;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache;
use crate::config::settings;
use crate::http::auth::JwtAuth;
use crate::recompute::{recompute_ratings, RecomputeScope};

#[derive(Deserialize, Default)]
pub struct RecomputeReq {
    /// Omit to recompute every league.
    #[serde(default)]
    pub league_id: Option<Uuid>,
}

/// POST /api/admin/ratings/recompute
#[post("/admin/ratings/recompute")]
pub async fn recompute(
    auth: JwtAuth,
    info: Option<web::Json<RecomputeReq>>,
    db: web::Data<PgPool>,
    redis: web::Data<RedisClient>,
) -> impl Responder {
    if !auth.is_admin {
        return HttpResponse::Forbidden().body("admin only");
    }

    let req = info.map(web::Json::into_inner).unwrap_or_default();
    let scope = match req.league_id {
        Some(id) => RecomputeScope::League(id),
        None => RecomputeScope::AllLeagues,
    };
    log::info!("user {} requested rating recompute for {scope}", auth.user_id);

    let report = recompute_ratings(db.get_ref(), scope, &settings().rating_policy()).await;
    if !report.is_success() {
        return HttpResponse::InternalServerError().json(report);
    }

    cache::invalidate_standings(&redis, scope).await;
    HttpResponse::Ok().json(report)
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(recompute);
}
