//! HTTP surface for the lookup pipeline.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use weather_core::WeatherService;

use crate::routes;

/// Application state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    pub service: WeatherService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::weather_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn run(service: WeatherService, host: &str, port: u16) -> Result<()> {
    let provider = service.provider_id();
    let app = router(Arc::new(AppState { service }));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%provider, "Weather API running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Weather API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
