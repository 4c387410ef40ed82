//! HTTP API layer
//!
//! - `POST /api/shorten`, `GET /api/stats[/{code}]`, `POST|GET /api/logs`
//! - `GET|HEAD /{code}` redirect

pub mod middleware;
pub mod services;

use actix_web::web;

/// Register every route on an actix `App`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(services::api_routes())
        .service(services::redirect_routes());
}
