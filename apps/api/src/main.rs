mod assistants;
mod catalog;
mod config;
mod errors;
mod llm_client;
mod models;
mod projects;
mod prompt;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::projects::chat::ChatHistory;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ProjectStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ProxyForce API v{}", env!("CARGO_PKG_VERSION"));

    // Project store (single JSON document)
    let store = Arc::new(ProjectStore::new(config.projects_file.clone()));
    let existing = store.load().await?;
    info!(
        "Project store at {} ({} projects)",
        store.path().display(),
        existing.len()
    );

    // Completion backend
    let llm = OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.completion_model.clone(),
        config.completion_temperature,
        config.completion_timeout,
    )?;
    info!(
        "Completion backend initialized (model: {}, timeout: {:?})",
        config.completion_model, config.completion_timeout
    );

    let state = AppState {
        store,
        llm: Arc::new(llm),
        chats: ChatHistory::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
