// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Spotify credentials are read once at startup but only validated when a
//! request needs them, so a partially configured deployment still serves
//! `/health` and answers now-playing requests with a 500.

use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Spotify accounts service base URL (token endpoint lives under it)
    pub spotify_accounts_url: String,
    /// Spotify Web API base URL
    pub spotify_api_url: String,
    /// Timeout applied to each outbound Spotify call
    pub upstream_timeout: Duration,
    /// Reuse access grants across requests until they expire
    pub token_cache_enabled: bool,
    /// Spotify credential triple, possibly incomplete
    pub spotify: SpotifyCredentialsConfig,
}

/// The three Spotify values as read from the environment.
///
/// Any of them may be absent; see [`SpotifyCredentialsConfig::resolve`].
#[derive(Clone, Default)]
pub struct SpotifyCredentialsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
}

/// A complete credential triple. Constant for the process lifetime.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for SpotifyCredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentialsConfig")
            .field("client_id", &redacted(&self.client_id))
            .field("client_secret", &redacted(&self.client_secret))
            .field("refresh_token", &redacted(&self.refresh_token))
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Presence is useful when debugging config; the value never is.
fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

impl SpotifyCredentialsConfig {
    /// Build the triple from raw values, treating blank strings as absent.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            client_id: non_empty(client_id),
            client_secret: non_empty(client_secret),
            refresh_token: non_empty(refresh_token),
        }
    }

    fn from_env() -> Self {
        Self::new(
            env::var("SPOTIFY_CLIENT_ID").ok(),
            env::var("SPOTIFY_CLIENT_SECRET").ok(),
            env::var("SPOTIFY_REFRESH_TOKEN").ok(),
        )
    }

    /// Resolve into usable credentials, naming the first missing variable.
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        let client_id = self
            .client_id
            .clone()
            .ok_or(ConfigError::Missing("SPOTIFY_CLIENT_ID"))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or(ConfigError::Missing("SPOTIFY_CLIENT_SECRET"))?;
        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or(ConfigError::Missing("SPOTIFY_REFRESH_TOKEN"))?;

        Ok(Credentials {
            client_id,
            client_secret,
            refresh_token,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.resolve().is_ok()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing Spotify credentials are not an error here; they surface per
    /// request as a misconfiguration.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 8080,
        };

        let timeout_secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::Invalid("UPSTREAM_TIMEOUT_SECS", v)),
            },
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let token_cache_enabled = match env::var("SPOTIFY_TOKEN_CACHE") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("SPOTIFY_TOKEN_CACHE", v))?,
            Err(_) => false,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
            spotify_accounts_url: base_url_from_env("SPOTIFY_ACCOUNTS_URL", DEFAULT_ACCOUNTS_URL),
            spotify_api_url: base_url_from_env("SPOTIFY_API_URL", DEFAULT_API_URL),
            upstream_timeout: Duration::from_secs(timeout_secs),
            token_cache_enabled,
            spotify: SpotifyCredentialsConfig::from_env(),
        })
    }

    /// Deterministic config for tests. Upstream URLs point nowhere useful.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            spotify_accounts_url: "http://127.0.0.1:9".to_string(),
            spotify_api_url: "http://127.0.0.1:9/v1".to_string(),
            upstream_timeout: Duration::from_secs(2),
            token_cache_enabled: false,
            spotify: SpotifyCredentialsConfig::new(
                Some("test_client_id".to_string()),
                Some("test_client_secret".to_string()),
                Some("test_refresh_token".to_string()),
            ),
        }
    }
}

fn base_url_from_env(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
