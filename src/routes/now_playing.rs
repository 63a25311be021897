// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Now-playing route.

use crate::error::{AppError, Result};
use crate::models::PlaybackSnapshot;
use crate::AppState;
use axum::{extract::State, http::Method, routing::any, Json, Router};
use std::sync::Arc;

/// Now-playing routes.
///
/// Mounted for every method so non-GET requests get the JSON 405 instead
/// of axum's empty one.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/now-playing", any(now_playing))
        .route("/api/spotify-now-playing", any(now_playing))
}

/// Report what the configured account is currently playing.
async fn now_playing(
    State(state): State<Arc<AppState>>,
    method: Method,
) -> Result<Json<PlaybackSnapshot>> {
    if method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    let snapshot = state.now_playing.get_now_playing().await?;
    tracing::debug!(is_playing = snapshot.is_playing(), "Now playing resolved");
    Ok(Json(snapshot))
}
