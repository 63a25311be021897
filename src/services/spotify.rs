// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify API client.
//!
//! Handles:
//! - Refresh-token exchange against the accounts service
//! - Currently-playing lookup, reduced to a [`PlaybackSnapshot`]
//!
//! Tokens never appear in logs or errors.

use crate::config::{Config, Credentials};
use crate::error::NowPlayingError;
use crate::models::{AccessGrant, CurrentlyPlaying, PlaybackSnapshot};
use anyhow::Context;
use reqwest::StatusCode;

/// Outcome of a currently-playing lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackLookup {
    Snapshot(PlaybackSnapshot),
    /// Spotify rejected the access token. Reported as nothing playing, but
    /// callers holding a cached grant should drop it.
    Unauthorized,
}

impl PlaybackLookup {
    pub fn into_snapshot(self) -> PlaybackSnapshot {
        match self {
            PlaybackLookup::Snapshot(snapshot) => snapshot,
            PlaybackLookup::Unauthorized => PlaybackSnapshot::NotPlaying,
        }
    }
}

/// Spotify API client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_url: String,
    api_url: String,
}

impl SpotifyClient {
    /// Create a client whose calls are bounded by the configured timeout.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("failed building Spotify HTTP client")?;

        Ok(Self {
            http,
            accounts_url: config.spotify_accounts_url.clone(),
            api_url: config.spotify_api_url.clone(),
        })
    }

    /// Exchange the long-lived refresh token for a short-lived access grant.
    ///
    /// POST {accounts}/api/token
    /// Authorization: Basic base64(client_id:client_secret)
    pub async fn exchange_refresh_token(
        &self,
        credentials: &Credentials,
    ) -> Result<AccessGrant, NowPlayingError> {
        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    return NowPlayingError::Timeout("token");
                }
                NowPlayingError::UpstreamAuth {
                    status: None,
                    message: format!("Token request failed: {}", e.without_url()),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Spotify token exchange rejected"
            );
            return Err(NowPlayingError::UpstreamAuth {
                status: Some(status),
                message: body,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                NowPlayingError::Timeout("token")
            } else {
                NowPlayingError::Internal(
                    anyhow::Error::new(e.without_url()).context("reading token response"),
                )
            }
        })?;

        let grant: AccessGrant =
            serde_json::from_slice(&body).context("Token response JSON parse error")?;

        tracing::debug!(expires_in = ?grant.expires_in, "Spotify access grant issued");
        Ok(grant)
    }

    /// Look up what the account is currently playing.
    ///
    /// GET {api}/me/player/currently-playing
    /// Authorization: Bearer {access_token}
    ///
    /// Only 200 and 204 are interpreted; any other status reports nothing
    /// playing rather than an error.
    pub async fn currently_playing(
        &self,
        access_token: &str,
    ) -> Result<PlaybackLookup, NowPlayingError> {
        let url = format!("{}/me/player/currently-playing", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| playback_transport_error(e, "sending playback request"))?;

        let status = response.status();
        match status {
            StatusCode::NO_CONTENT => Ok(PlaybackLookup::Snapshot(PlaybackSnapshot::NotPlaying)),
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| playback_transport_error(e, "reading playback response"))?;

                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(PlaybackLookup::Snapshot(PlaybackSnapshot::NotPlaying));
                }

                let parsed: CurrentlyPlaying = serde_json::from_slice(&body)
                    .context("Currently playing JSON parse error")?;
                Ok(PlaybackLookup::Snapshot(
                    PlaybackSnapshot::from_currently_playing(parsed),
                ))
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Spotify rejected access token (401), reporting nothing playing");
                Ok(PlaybackLookup::Unauthorized)
            }
            other => {
                if other.as_u16() == 429 {
                    tracing::warn!("Spotify rate limit hit (429), reporting nothing playing");
                } else {
                    tracing::warn!(
                        status = other.as_u16(),
                        "Unexpected playback status, reporting nothing playing"
                    );
                }
                Ok(PlaybackLookup::Snapshot(PlaybackSnapshot::NotPlaying))
            }
        }
    }
}

fn playback_transport_error(err: reqwest::Error, context: &'static str) -> NowPlayingError {
    if err.is_timeout() {
        return NowPlayingError::Timeout("playback");
    }
    NowPlayingError::Internal(anyhow::Error::new(err.without_url()).context(context))
}
