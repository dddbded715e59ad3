use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::pipeline::ComparisonService;
use crate::weather::WeatherSource;

/// The full application: JSON API under `/api`, dashboard files for everything else
pub fn app(server: &ServerConfig, source: Arc<dyn WeatherSource>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState::new(ComparisonService::new(source));

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(cors)
}

pub async fn run(server: &ServerConfig, source: Arc<dyn WeatherSource>) -> Result<()> {
    let app = app(server, source);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", server.port);
    axum::serve(listener, app).await.context("Web server failed")?;
    Ok(())
}
