// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod now_playing;
pub mod spotify;
pub mod token_cache;

pub use now_playing::NowPlayingService;
pub use spotify::{PlaybackLookup, SpotifyClient};
pub use token_cache::{AccessGrantCache, CachedGrant};
