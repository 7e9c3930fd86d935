//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use std::time::Duration;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::{BasicAuth, RequestIdMiddleware};
use crate::api::services::{AppStartTime, configure, json_config, path_config, query_config};
use crate::config::AppConfig;
use crate::runtime::lifetime;

/// Upper bound on actix workers regardless of the configured CPU count.
const MAX_WORKERS: usize = 32;

pub async fn run_server(config: &AppConfig) -> Result<()> {
    let startup = lifetime::prepare_server_startup(config)
        .await
        .context("Failed to prepare server startup")?;

    let storage = web::Data::from(startup.storage.clone());
    let profile_service = web::Data::from(startup.profile_service.clone());
    let template_service = web::Data::from(startup.template_service.clone());
    let app_start_time = web::Data::new(AppStartTime::default());
    let auth = BasicAuth::new(startup.verifier.clone(), &config.auth.realm);

    let cpu_count = config.server.cpu_count.clamp(1, MAX_WORKERS);

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(Compress::default())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .app_data(storage.clone())
            .app_data(profile_service.clone())
            .app_data(template_service.clone())
            .app_data(app_start_time.clone())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .configure(configure(auth.clone()))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
