//! Commands and shared state of the audio thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::TrackSource;

use super::fetch::SourceError;

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current source. Stops whatever was playing.
    Load {
        source: TrackSource,
        duration_hint: Option<Duration>,
    },
    /// A loader thread finished reading the source for `generation`.
    SourceReady {
        generation: u64,
        result: Result<Arc<[u8]>, SourceError>,
    },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone)]
/// Playback snapshot shared between the element and the audio thread.
pub(super) struct PlaybackInfo {
    pub has_source: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            has_source: false,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

pub(super) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
