use crate::http;
use actix_web::web;

/// Mount every HTTP sub-module under `/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(http::standings::init_routes)
            .configure(http::ratings::init_routes)
            .configure(http::head_to_head::init_routes)
            .configure(http::predictions::init_routes)
            .configure(http::admin::init_routes)
            .configure(http::health::init_routes),
    );
}
