//! Verse Lens - scripture lookup and explanation backed by Gemini
//!
//! Serves a single page that fetches a passage, explains it, and judges a
//! reader's own explanation of it.

mod api;
mod bridge;
mod llm;
mod prompts;
mod session;
mod shell;

#[cfg(test)]
mod testing;

use api::{create_router, AppState};
use bridge::VerseBridge;
use llm::{GeminiService, LlmConfig, LoggingService};
use session::SessionStore;
use shell::Shell;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verse_lens=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("VERSE_LENS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let session_ttl = std::env::var("VERSE_LENS_SESSION_TTL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map_or(Duration::from_secs(3600), Duration::from_secs);

    let llm_config = LlmConfig::from_env();
    let shell = GeminiService::new(&llm_config).map(|service| {
        let service = Arc::new(LoggingService::new(Arc::new(service)));
        Shell::new(Arc::new(VerseBridge::new(service)))
    });

    match &shell {
        Ok(shell) => tracing::info!(model = %shell.model_id(), "Gemini client configured"),
        Err(e) => tracing::error!(
            error = %e,
            "Error configuring the Gemini API; the page will only show this error"
        ),
    }

    let state = AppState::new(shell, SessionStore::new(session_ttl));

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Verse Lens listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
