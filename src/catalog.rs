//! Catalog search adapter: remote lookups, the result list and adding a
//! chosen result to the playlist.
//!
//! The adapter never touches the playback controller directly. Callers hand
//! it a [`PlaylistSink`](crate::player::PlaylistSink) when a result should be
//! added.

mod client;
mod error;
mod model;
mod search;

pub use client::{CatalogBackend, HttpCatalog};
pub use error::CatalogError;
pub use model::CatalogTrack;
pub use search::{
    SearchPanel, add_selected, added_message, load_featured_playlists, load_top_tracks, search,
    top_tracks,
    track_from_result, validate_query,
};

#[cfg(test)]
mod tests;
