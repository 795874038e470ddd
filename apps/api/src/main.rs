mod config;
mod errors;
mod matching;
mod models;
mod routes;
mod sessions;
mod state;
mod view;
mod workspace;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::{Matcher, MockMatcher};
use crate::routes::build_router;
use crate::sessions::{spawn_reaper, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so a bad value fails before anything starts
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher v{}", env!("CARGO_PKG_VERSION"));

    // The only backend: canned results after a fixed delay
    let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::new(config.match_delay));
    info!(
        "Matcher initialized (backend: {}, delay: {:?})",
        matcher.backend(),
        config.match_delay
    );

    let sessions = SessionStore::new();
    spawn_reaper(sessions.clone(), config.session_idle_ttl);
    info!("Session reaper started (idle ttl: {:?})", config.session_idle_ttl);

    let state = AppState {
        config: config.clone(),
        sessions,
        matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
