//! HTTP timing middleware
//!
//! Logs method, path, status and latency of every request at debug level.

use std::time::Instant;

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use tracing::debug;

pub async fn request_timing(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.path().to_string();

    let result = next.call(req).await;

    let status = match &result {
        Ok(response) => response.status().as_u16(),
        Err(_) => 500,
    };
    debug!(
        "{} {} -> {} ({:.2}ms)",
        method,
        path,
        status,
        start.elapsed().as_secs_f64() * 1000.0
    );

    result
}
