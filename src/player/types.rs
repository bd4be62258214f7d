//! Playlist and playback state types.

use crate::config::RepeatModeSetting;
use crate::library::Track;

/// What happens when a track ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Keep wrapping through the playlist.
    RepeatAll,
    /// Restart the current track when it ends.
    RepeatOne,
}

impl RepeatMode {
    /// The next mode in the `Off -> RepeatAll -> RepeatOne -> Off` cycle.
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::RepeatAll,
            RepeatMode::RepeatAll => RepeatMode::RepeatOne,
            RepeatMode::RepeatOne => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat Off",
            RepeatMode::RepeatAll => "Repeat All",
            RepeatMode::RepeatOne => "Repeat One",
        }
    }
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(s: RepeatModeSetting) -> Self {
        match s {
            RepeatModeSetting::Off => RepeatMode::Off,
            RepeatModeSetting::RepeatAll => RepeatMode::RepeatAll,
            RepeatModeSetting::RepeatOne => RepeatMode::RepeatOne,
        }
    }
}

/// Snapshot of the transport state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    /// Index into the playlist; meaningless while the playlist is empty.
    pub current_index: usize,
    /// Projection of the media element's play/pause notifications.
    pub is_playing: bool,
    pub repeat_mode: RepeatMode,
    pub shuffle: bool,
}

/// Ordered list of tracks; insertion order is display and playback order.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Append `track` and return its index.
    pub fn push(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

/// Append-only handle onto a playlist.
///
/// Producers such as the catalog search get this instead of the whole
/// controller.
pub trait PlaylistSink {
    /// Append `track` and return its index.
    fn append_track(&mut self, track: Track) -> usize;
}

impl PlaylistSink for Playlist {
    fn append_track(&mut self, track: Track) -> usize {
        self.push(track)
    }
}
