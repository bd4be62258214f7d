use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Blank fields are skipped; when nothing is left the title is used as-is.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let value = match f {
            TrackDisplayField::Title => track.title.trim().to_string(),
            TrackDisplayField::Artist => track.artist.trim().to_string(),
            TrackDisplayField::Album => track.album.trim().to_string(),
            TrackDisplayField::Source => track.source.describe(),
        };
        if !value.is_empty() {
            parts.push(value);
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
