// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Now-playing proxy: a tiny backend for a portfolio site.
//!
//! Exchanges a stored Spotify refresh token for an access token, asks
//! Spotify what is currently playing, and returns a small, stable JSON
//! snapshot to the frontend without exposing credentials.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::NowPlayingService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub now_playing: NowPlayingService,
}

impl AppState {
    /// Build state from config, wiring the Spotify client and optional cache.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let now_playing = NowPlayingService::from_config(&config)?;
        Ok(Self {
            config,
            now_playing,
        })
    }
}
