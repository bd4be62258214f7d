//! Work handed to the background worker and what comes back.

use std::path::PathBuf;

use crate::catalog::{CatalogError, CatalogTrack};
use crate::library::{LoadError, Track};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    Search { ticket: u64, query: String },
    TopTracks { ticket: u64 },
    AddFile { path: PathBuf },
}

#[derive(Debug)]
pub enum TaskResult {
    Search {
        ticket: u64,
        result: Result<Vec<CatalogTrack>, CatalogError>,
    },
    TopTracks {
        ticket: u64,
        result: Result<Vec<CatalogTrack>, CatalogError>,
    },
    FileLoaded {
        path: PathBuf,
        result: Result<Track, LoadError>,
    },
}
