//! Server mode
//!
//! Starts the actix HTTP server on top of a prepared [`AppContext`].

use std::time::Duration;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders, from_fn},
    web,
};
use anyhow::{Context, Result};
use tracing::info;

use crate::api::configure_routes;
use crate::api::middleware::request_timing;
use crate::config::ServerConfig;
use crate::runtime::lifetime::startup::AppContext;

/// Run the HTTP server until it is stopped (Ctrl-C / SIGTERM)
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(ctx: AppContext, server_config: &ServerConfig) -> Result<()> {
    let bind_address = format!("{}:{}", server_config.host, server_config.port);
    let data = web::Data::new(ctx);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(request_timing))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(data.clone())
            .configure(configure_routes)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting server at http://{}", bind_address);
    server.run().await.context("HTTP server error")?;
    info!("Server stopped");

    Ok(())
}
