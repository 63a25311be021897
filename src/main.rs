// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Now-Playing Proxy API Server
//!
//! Serves the portfolio site's "currently playing" widget by proxying a
//! single Spotify account's playback state.

use now_playing_proxy::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        token_cache = config.token_cache_enabled,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Starting Now-Playing Proxy"
    );

    if !config.spotify.is_complete() {
        // Not fatal: requests will answer 500 until the env vars are set
        tracing::warn!(
            "Spotify credentials incomplete; now-playing requests will fail until configured"
        );
    }

    let state = Arc::new(AppState::from_config(config.clone())?);

    // Build router
    let app = now_playing_proxy::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("now_playing_proxy=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
