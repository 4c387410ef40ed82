//! HTTP services

mod helpers;
pub mod links;
pub mod logs;
pub mod redirect;
pub mod types;

use actix_web::{HttpResponse, error, web};

pub use helpers::{api_result, error_from_shortbox, error_response, success_response};
pub use redirect::{RedirectService, redirect_routes};
pub use types::{ApiResponse, ErrorCode};

/// Routes under `/api`
pub fn api_routes() -> actix_web::Scope {
    let json_config = web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let resp: HttpResponse = error_response(
                actix_web::http::StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                &err.to_string(),
            );
            error::InternalError::from_response(err, resp).into()
        });

    web::scope("/api")
        .app_data(json_config)
        .route("/shorten", web::post().to(links::shorten))
        .route("/stats", web::get().to(links::list_stats))
        .route("/stats/{code}", web::get().to(links::get_stats))
        .route("/logs", web::post().to(logs::post_log))
        .route("/logs", web::get().to(logs::list_queued))
}
