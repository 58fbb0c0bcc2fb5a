//! Server mode
//!
//! Builds the shared services, mounts the configured routes and runs the
//! actix-web server until a shutdown signal arrives.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::constants::MAX_PAYLOAD_BYTES;
use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{
    AppStartTime, fallback_service, health_routes, micropub_routes, search_routes,
    webhook_routes, webmention_routes,
};
use crate::config::{RouteConfig, StaticConfig};
use crate::runtime::lifetime::{self, startup::StartupContext};

/// Register app data, routes and the resolver fallback
pub fn configure_app(
    ctx: &StartupContext,
    routes: &RouteConfig,
    start_time: &AppStartTime,
    cfg: &mut web::ServiceConfig,
) {
    cfg.app_data(web::Data::new(ctx.resolver.clone()))
        .app_data(web::Data::new(ctx.pages.clone()))
        .app_data(web::Data::new(ctx.micropub.clone()))
        .app_data(web::Data::new(ctx.search.clone()))
        .app_data(web::Data::new(ctx.webhook.clone()))
        .app_data(web::Data::new(ctx.webmention.clone()))
        .app_data(web::Data::new(start_time.clone()))
        .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
        .service(health_routes(&routes.health))
        .service(micropub_routes(&routes.micropub))
        .service(search_routes(&routes.search))
        .service(webhook_routes(&routes.webhook))
        .service(webmention_routes(&routes.webmention))
        .default_service(fallback_service());
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig, config_path: &str) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let ctx = lifetime::startup::prepare_server_startup(config).map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    lifetime::reload::setup_reload_mechanism(config_path.to_string(), ctx.resolver.clone());

    let routes = config.routes.clone();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(|cfg| configure_app(&ctx, &routes, &app_start_time, cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = {
        #[cfg(unix)]
        {
            if let Some(ref socket_path) = config.server.unix_socket {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path)
                        .with_context(|| format!("Failed to remove stale socket {}", socket_path))?;
                }
                server
                    .bind_uds(socket_path)
                    .with_context(|| format!("Failed to bind {}", socket_path))?
            } else {
                warn!("Starting server at http://{}", bind_address);
                server
                    .bind(&bind_address)
                    .with_context(|| format!("Failed to bind {}", bind_address))?
            }
        }

        #[cfg(not(unix))]
        {
            warn!("Starting server at http://{}", bind_address);
            server
                .bind(&bind_address)
                .with_context(|| format!("Failed to bind {}", bind_address))?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}
