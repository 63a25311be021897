// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Normalized now-playing snapshot returned to the frontend.

use crate::models::spotify::CurrentlyPlaying;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Either nothing is playing, or a fully populated track.
///
/// Serializes as `{"isPlaying": false}` or
/// `{"isPlaying": true, "title", "artist", "albumArt", "trackUrl"}`, with the
/// two optional fields rendered as `null` rather than omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackSnapshot {
    NotPlaying,
    Playing(PlayingTrack),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayingTrack {
    pub title: String,
    /// Contributing artist names joined with ", "
    pub artist: String,
    pub album_art_url: Option<String>,
    pub track_url: Option<String>,
}

impl PlaybackSnapshot {
    /// Reduce a currently-playing payload to a snapshot.
    ///
    /// A track without a name is treated as nothing playing.
    pub fn from_currently_playing(body: CurrentlyPlaying) -> Self {
        let Some(item) = body.item else {
            return Self::NotPlaying;
        };

        let title = match item.name {
            Some(name) if !name.is_empty() => name,
            _ => return Self::NotPlaying,
        };

        let artist = item
            .artists
            .into_iter()
            .filter_map(|a| a.name)
            .collect::<Vec<_>>()
            .join(", ");

        let album_art_url = item
            .album
            .and_then(|album| album.images.into_iter().next())
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty());

        let track_url = item
            .external_urls
            .get("spotify")
            .filter(|url| !url.is_empty())
            .cloned();

        Self::Playing(PlayingTrack {
            title,
            artist,
            album_art_url,
            track_url,
        })
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing(_))
    }
}

impl Serialize for PlaybackSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotPlaying => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("isPlaying", &false)?;
                map.end()
            }
            Self::Playing(track) => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("isPlaying", &true)?;
                map.serialize_entry("title", &track.title)?;
                map.serialize_entry("artist", &track.artist)?;
                map.serialize_entry("albumArt", &track.album_art_url)?;
                map.serialize_entry("trackUrl", &track.track_url)?;
                map.end()
            }
        }
    }
}
