use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::error::AppError;

/// CORS policy admitting only the configured front-end origin
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origin.trim() == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin: HeaderValue = allowed_origin
        .trim()
        .parse()
        .with_context(|| format!("Invalid allowed origin: {allowed_origin}"))?;
    Ok(cors.allow_origin(origin))
}

pub fn app(state: AppState, config: &ServerConfig) -> Result<Router> {
    Ok(api::router(state)
        .layer(cors_layer(&config.allowed_origin)?)
        .layer(TraceLayer::new_for_http()))
}

pub async fn run(state: AppState, config: &ServerConfig) -> Result<()> {
    let app = app(state, config)?;

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::server(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Server running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
