//! Importing a single local audio file into memory.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use thiserror::Error;

use crate::config::LibrarySettings;

use super::model::{Track, TrackSource};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a playable audio file: {reason}")]
    Probe { path: PathBuf, reason: String },
}

/// Probe the container in `bytes` and return the stream duration.
pub fn probe_duration(bytes: &[u8]) -> Result<Duration, String> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .map_err(|e| e.to_string())?
        .read()
        .map_err(|e| e.to_string())?;
    Ok(tagged.properties().duration())
}

/// Read `path` fully into memory and turn it into a track.
///
/// The title is the file name without its extension; artist, album and cover
/// use the configured placeholders.
pub fn load_local_file(path: &Path, settings: &LibrarySettings) -> Result<Track, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let duration = probe_duration(&bytes).map_err(|reason| LoadError::Probe {
        path: path.to_path_buf(),
        reason,
    })?;

    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    log::info!(
        "loaded local file {} ({} bytes, {:?})",
        path.display(),
        bytes.len(),
        duration
    );

    Ok(Track {
        title,
        artist: settings.placeholder_artist.clone(),
        album: settings.placeholder_album.clone(),
        duration: Some(duration),
        source: TrackSource::Bytes(Arc::from(bytes)),
        cover: settings.placeholder_cover.clone(),
    })
}
