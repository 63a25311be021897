// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every error renders as `{"error": "<message>"}`. Upstream diagnostics are
//! logged, never returned.

use crate::config::ConfigError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::StatusCode as UpstreamStatus;
use serde::Serialize;

/// Failures while talking to Spotify on behalf of a request.
#[derive(Debug, thiserror::Error)]
pub enum NowPlayingError {
    #[error("Spotify credentials not configured: {0}")]
    Configuration(#[from] ConfigError),

    /// The token exchange was rejected or could not complete.
    #[error("Spotify token exchange failed ({}): {message}", status_label(.status))]
    UpstreamAuth {
        status: Option<UpstreamStatus>,
        message: String,
    },

    /// An outbound call exceeded the configured timeout.
    #[error("Spotify {0} request timed out")]
    Timeout(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn status_label(status: &Option<UpstreamStatus>) -> String {
    status
        .map(|s| s.as_u16().to_string())
        .unwrap_or_else(|| "no response".to_string())
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(ConfigError),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub const MISCONFIGURED_MESSAGE: &'static str =
        "Missing Spotify env vars (SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET, SPOTIFY_REFRESH_TOKEN)";
    pub const UPSTREAM_MESSAGE: &'static str = "Spotify token failed";
    pub const INTERNAL_MESSAGE: &'static str = "Failed to fetch now playing";
    pub const METHOD_MESSAGE: &'static str = "Method not allowed";

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ServerMisconfigured(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<NowPlayingError> for AppError {
    fn from(err: NowPlayingError) -> Self {
        match err {
            NowPlayingError::Configuration(e) => AppError::ServerMisconfigured(e),
            e @ (NowPlayingError::UpstreamAuth { .. } | NowPlayingError::Timeout(_)) => {
                AppError::UpstreamUnavailable(e.to_string())
            }
            NowPlayingError::Internal(e) => AppError::Internal(e),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            AppError::MethodNotAllowed => Self::METHOD_MESSAGE,
            AppError::ServerMisconfigured(err) => {
                tracing::error!(error = %err, "Spotify credentials missing");
                Self::MISCONFIGURED_MESSAGE
            }
            AppError::UpstreamUnavailable(detail) => {
                tracing::error!(error = %detail, "Spotify upstream unavailable");
                Self::UPSTREAM_MESSAGE
            }
            AppError::Internal(err) => {
                tracing::error!(error = %format!("{:#}", err), "Now playing failed");
                Self::INTERNAL_MESSAGE
            }
        };

        let mut response = (status, Json(ErrorResponse { error })).into_response();
        if matches!(self, AppError::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET"));
        }
        response
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
