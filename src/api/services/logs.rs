//! Logging sink API

use actix_web::{Responder, web};
use serde::{Deserialize, Serialize};

use super::helpers::blocking_api;
use crate::errors::ShortboxError;
use crate::runtime::lifetime::startup::AppContext;
use crate::services::LogOutcome;

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub stack: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub outcome: LogOutcome,
}

/// POST /api/logs
pub async fn post_log(ctx: web::Data<AppContext>, body: web::Json<LogRequest>) -> impl Responder {
    let req = body.into_inner();
    let sink = ctx.log_sink.clone();
    blocking_api(move || {
        sink.log(&req.stack, &req.level, &req.package, &req.message)
            .map(|outcome| LogResponse { outcome })
    })
    .await
}

/// GET /api/logs
pub async fn list_queued(ctx: web::Data<AppContext>) -> impl Responder {
    let sink = ctx.log_sink.clone();
    blocking_api(move || Ok::<_, ShortboxError>(sink.queued())).await
}
