// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod playback;
pub mod spotify;

pub use playback::{PlaybackSnapshot, PlayingTrack};
pub use spotify::{AccessGrant, CurrentlyPlaying};
