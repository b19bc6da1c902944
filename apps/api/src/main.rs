mod ats;
mod config;
mod errors;
mod extract;
mod generation;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::gemini::GeminiBackend;
use crate::llm_client::Dispatcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation backend + credential pool
    let backend = GeminiBackend::new(
        &config.gemini_base_url,
        Duration::from_secs(config.generation_timeout_secs),
    )?;
    if config.credentials.is_empty() {
        warn!("No GEMINI_API_KEY* configured; generation endpoints will fail until keys are set");
    }
    info!(
        "Generation dispatcher initialized (model: {}, {} credentials, timeout {}s)",
        llm_client::gemini::MODEL,
        config.credentials.len(),
        config.generation_timeout_secs
    );
    let dispatcher = Dispatcher::new(Arc::new(backend), config.credentials.clone());

    let state = AppState { dispatcher };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the frontend host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
