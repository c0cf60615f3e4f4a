mod agent;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod service;

use std::sync::Arc;

use tracing::{info, warn};

use crate::agent::{GeminiAgentService, ReplyAgent};
use crate::config::RelayConfig;
use crate::db::conversation_repository::ConversationRepository;
use crate::db::ConversationStore;
use crate::service::relay_service::RelayService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_relay=debug,tower_http=debug".into()),
        )
        .init();

    let config = RelayConfig::from_env();

    // ── Conversation store (best effort) ──────────────────────────────────────
    let repository = match ConversationRepository::connect(&config).await {
        Ok(repo) => Some(repo),
        Err(e) => {
            warn!("Conversation store unavailable, exchanges will not be persisted: {e}");
            None
        }
    };

    // ── Upstream agent ────────────────────────────────────────────────────────
    let agent = GeminiAgentService::from_config(&config);
    if agent.is_none() {
        warn!("GEMINI_API_KEY is not set; /api/gemini will answer with an error");
    }

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let svc = RelayService::new(
        agent.map(|a| Arc::new(a) as Arc<dyn ReplyAgent>),
        repository
            .clone()
            .map(|r| Arc::new(r) as Arc<dyn ConversationStore>),
    );
    let app = routes::router(svc);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(repo) = repository {
        repo.close().await;
        info!("Conversation store connection closed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
