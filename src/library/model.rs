use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where the audio element gets the bytes for a track.
#[derive(Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// Remote audio fetched over HTTP(S).
    Url(String),
    /// A file on the local filesystem, read when the track is loaded.
    File(PathBuf),
    /// Audio already held in memory (a file added through the prompt).
    Bytes(Arc<[u8]>),
}

impl TrackSource {
    /// Short human-readable description used by the metadata popup and logs.
    pub fn describe(&self) -> String {
        match self {
            TrackSource::Url(url) => url.clone(),
            TrackSource::File(path) => path.display().to_string(),
            TrackSource::Bytes(bytes) => format!("<in-memory, {} bytes>", bytes.len()),
        }
    }
}

impl fmt::Debug for TrackSource {
    // Keep raw audio bytes out of debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            TrackSource::File(path) => f.debug_tuple("File").field(path).finish(),
            TrackSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
        }
    }
}

/// One playable item in the playlist.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Metadata duration, when known up front.
    pub duration: Option<Duration>,
    pub source: TrackSource,
    /// Cover art URI.
    pub cover: String,
}
