//! Liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};
use redis::{AsyncCommands, Client as RedisClient};
use sqlx::PgPool;

#[get("/healthz")]
pub async fn healthz(db: web::Data<PgPool>, redis: web::Data<RedisClient>) -> impl Responder {
    let db_ok = sqlx::query("SELECT 1").execute(&**db).await.is_ok();

    // Redis only backs the standings cache: report it, don't fail on it.
    let redis_ok = match redis.get_multiplexed_async_connection().await {
        Ok(mut conn) => conn.ping::<String>().await.is_ok(),
        Err(_) => false,
    };

    let body = serde_json::json!({ "db": db_ok, "redis": redis_ok });
    if db_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
