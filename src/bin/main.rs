use actix_web::{middleware::Logger, web, App, HttpServer};
use league_server::{
    config::settings,
    http, metrics,
    recompute::{recompute_ratings, RecomputeScope},
};
use redis::Client as RedisClient;
use sqlx::postgres::PgPoolOptions;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
    let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());
    let max_connections = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(5);

    // Postgres pool + schema
    let db_pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to create Postgres pool");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to apply migrations");

    // Redis client (standings cache)
    let redis_client = RedisClient::open(redis_url.as_str()).expect("Invalid REDIS_URL");

    if settings().recompute_on_start {
        let report =
            recompute_ratings(&db_pool, RecomputeScope::AllLeagues, &settings().rating_policy())
                .await;
        if let Some(err) = &report.error {
            log::error!("start-up rating recompute failed: {err}");
        }
    }

    log::info!("listening on {server_addr}");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(redis_client.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
