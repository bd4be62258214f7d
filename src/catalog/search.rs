use std::time::Duration;

use crate::library::{Track, TrackSource};
use crate::notice::Notice;
use crate::player::PlaylistSink;

use super::client::CatalogBackend;
use super::error::CatalogError;
use super::model::CatalogTrack;

const NO_RESULTS: &str = "No tracks found";

/// Reject queries shorter than `min_chars` after trimming.
pub fn validate_query(query: &str, min_chars: usize) -> Result<&str, CatalogError> {
    let trimmed = query.trim();
    if trimmed.chars().count() < min_chars {
        return Err(CatalogError::QueryTooShort { min: min_chars });
    }
    Ok(trimmed)
}

/// Validate `query` and look it up. Invalid queries never reach the backend.
pub fn search<B: CatalogBackend + ?Sized>(
    backend: &B,
    query: &str,
    min_chars: usize,
) -> Result<Vec<CatalogTrack>, CatalogError> {
    let query = validate_query(query, min_chars)?;
    let tracks = backend.search(query).inspect_err(|e| {
        log::error!("search for {query:?} failed: {e}");
    })?;
    log::info!("search for {query:?} returned {} tracks", tracks.len());
    Ok(tracks)
}

/// Most popular tracks. Failures are logged and passed on.
pub fn top_tracks<B: CatalogBackend + ?Sized>(backend: &B) -> Result<Vec<CatalogTrack>, CatalogError> {
    let tracks = backend.top_tracks().inspect_err(|e| {
        log::error!("failed to load top tracks: {e}");
    })?;
    log::info!("top tracks returned {} tracks", tracks.len());
    Ok(tracks)
}

/// Top tracks, or an empty list when the catalog cannot be reached.
pub fn load_top_tracks<B: CatalogBackend + ?Sized>(backend: &B) -> Vec<CatalogTrack> {
    top_tracks(backend).unwrap_or_default()
}

/// Featured playlists, or an empty list when the catalog cannot be reached.
pub fn load_featured_playlists<B: CatalogBackend + ?Sized>(backend: &B) -> Vec<serde_json::Value> {
    backend.featured_playlists().unwrap_or_else(|e| {
        log::error!("failed to load playlists: {e}");
        Vec::new()
    })
}

/// Build a playable track from a search result.
pub fn track_from_result(result: &CatalogTrack, default_cover: &str) -> Result<Track, CatalogError> {
    let preview = result
        .preview
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or(CatalogError::NoPreview)?;

    let cover = result
        .cover
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(default_cover);

    Ok(Track {
        title: result.title.clone(),
        artist: result.artist.clone(),
        album: result.album.clone(),
        duration: result
            .duration
            .filter(|d| *d > 0.0)
            .and_then(|d| Duration::try_from_secs_f64(d).ok()),
        source: TrackSource::Url(preview.to_string()),
        cover: cover.to_string(),
    })
}

/// Append `result` to the playlist behind `sink`. Returns the new index.
pub fn add_selected<S: PlaylistSink + ?Sized>(
    result: &CatalogTrack,
    sink: &mut S,
    default_cover: &str,
) -> Result<usize, CatalogError> {
    let track = track_from_result(result, default_cover)?;
    Ok(sink.append_track(track))
}

pub fn added_message(result: &CatalogTrack) -> String {
    format!("Added: {} by {}", result.title, result.artist)
}

/// State of the search box and its result list.
#[derive(Debug, Default)]
pub struct SearchPanel {
    pub query: String,
    /// Heading of the result list ("Results", "Top tracks", ...).
    pub heading: String,
    results: Vec<CatalogTrack>,
    selected: usize,
    latest_ticket: u64,
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new lookup. Only the returned ticket's answer will be shown.
    pub fn begin(&mut self) -> u64 {
        self.latest_ticket += 1;
        self.latest_ticket
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest_ticket
    }

    /// Apply the answer for `ticket`. Returns the alert to show, if any.
    ///
    /// Stale answers are dropped and empty answers leave the list untouched.
    pub fn apply(
        &mut self,
        ticket: u64,
        heading: &str,
        result: Result<Vec<CatalogTrack>, CatalogError>,
    ) -> Option<Notice> {
        if !self.is_latest(ticket) {
            log::debug!("dropping stale catalog response (ticket {ticket})");
            return None;
        }
        match result {
            Err(e) => Some(Notice::error(e.user_message())),
            Ok(tracks) if tracks.is_empty() => Some(Notice::info(NO_RESULTS)),
            Ok(tracks) => {
                self.heading = heading.to_string();
                self.render_results(tracks);
                None
            }
        }
    }

    /// Replace the result list and move the selection to the top.
    pub fn render_results(&mut self, tracks: Vec<CatalogTrack>) {
        self.results = tracks;
        self.selected = 0;
    }

    pub fn results(&self) -> &[CatalogTrack] {
        &self.results
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_result(&self) -> Option<&CatalogTrack> {
        self.results.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + self.results.len() - 1) % self.results.len();
        }
    }
}
