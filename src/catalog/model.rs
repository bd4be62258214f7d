use serde::{Deserialize, Serialize};

/// One entry of a catalog response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Seconds.
    pub duration: Option<f64>,
    /// URL of a short playable excerpt.
    pub preview: Option<String>,
    pub cover: Option<String>,
}
