// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Now-playing service: credentials in, snapshot out.

use crate::config::{Config, Credentials, SpotifyCredentialsConfig};
use crate::error::NowPlayingError;
use crate::models::PlaybackSnapshot;
use crate::services::spotify::{PlaybackLookup, SpotifyClient};
use crate::services::token_cache::{AccessGrantCache, CachedGrant};
use chrono::Utc;

/// Answers "what is playing" for the single configured Spotify account.
///
/// Each call does a token exchange followed by a playback lookup. With a
/// grant cache attached, the exchange is skipped while a cached grant is
/// still fresh.
#[derive(Clone)]
pub struct NowPlayingService {
    client: SpotifyClient,
    credentials: SpotifyCredentialsConfig,
    cache: Option<AccessGrantCache>,
}

impl NowPlayingService {
    pub fn new(
        client: SpotifyClient,
        credentials: SpotifyCredentialsConfig,
        cache: Option<AccessGrantCache>,
    ) -> Self {
        Self {
            client,
            credentials,
            cache,
        }
    }

    /// Build the service from application config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = SpotifyClient::new(config)?;
        let cache = config.token_cache_enabled.then(AccessGrantCache::new);
        Ok(Self::new(client, config.spotify.clone(), cache))
    }

    pub fn cache(&self) -> Option<&AccessGrantCache> {
        self.cache.as_ref()
    }

    /// Fetch the current playback snapshot.
    ///
    /// Fails before any network call if credentials are incomplete. A
    /// rejected token exchange is an error; problems reading playback
    /// after a successful exchange mostly degrade to `NotPlaying`.
    pub async fn get_now_playing(&self) -> Result<PlaybackSnapshot, NowPlayingError> {
        let credentials = self.credentials.resolve()?;
        let access_token = self.access_token(&credentials).await?;

        let lookup = self.client.currently_playing(&access_token).await?;
        if lookup == PlaybackLookup::Unauthorized {
            if let Some(cache) = &self.cache {
                cache.invalidate_token(&credentials.client_id, &access_token);
            }
        }

        Ok(lookup.into_snapshot())
    }

    async fn access_token(&self, credentials: &Credentials) -> Result<String, NowPlayingError> {
        let Some(cache) = &self.cache else {
            let grant = self.client.exchange_refresh_token(credentials).await?;
            return Ok(grant.access_token);
        };

        let key = credentials.client_id.as_str();
        if let Some(token) = cache.fresh_token(key, Utc::now()) {
            tracing::debug!("Using cached Spotify access grant");
            return Ok(token);
        }

        let lock = cache.refresh_lock(key);
        let _guard = lock.lock().await;

        // Another request may have refreshed while we waited
        if let Some(token) = cache.fresh_token(key, Utc::now()) {
            tracing::debug!("Using access grant refreshed by concurrent request");
            return Ok(token);
        }

        let issued_at = Utc::now();
        let grant = self.client.exchange_refresh_token(credentials).await?;
        if let Some(cached) = CachedGrant::from_grant(&grant, issued_at) {
            cache.insert(key, cached);
        }
        Ok(grant.access_token)
    }
}
