// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/run", web::post().to(handlers::run))
        .route("/health", web::get().to(handlers::health_check));
}
