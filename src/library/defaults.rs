//! Built-in starter playlist of Creative Commons tracks.

use std::time::Duration;

use super::model::{Track, TrackSource};

const ALBUM: &str = "Royalty Free Music";
const ARTIST: &str = "Bensound";

// (title, seconds, audio url, cover url)
const DEFAULTS: [(&str, u64, &str, &str); 5] = [
    (
        "Sunny",
        264,
        "https://www.bensound.com/bensound-music/bensound-sunny.mp3",
        "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?w=300&h=300&fit=crop",
    ),
    (
        "Ukulele",
        128,
        "https://www.bensound.com/bensound-music/bensound-ukulele.mp3",
        "https://images.unsplash.com/photo-1459749411175-04bf5292ceea?w=300&h=300&fit=crop",
    ),
    (
        "Ambient",
        146,
        "https://www.bensound.com/bensound-music/bensound-ambient.mp3",
        "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=300&h=300&fit=crop",
    ),
    (
        "Electronica",
        182,
        "https://www.bensound.com/bensound-music/bensound-electronica.mp3",
        "https://images.unsplash.com/photo-1514525253161-7a46d19cd819?w=300&h=300&fit=crop",
    ),
    (
        "Happiness",
        138,
        "https://www.bensound.com/bensound-music/bensound-happiness.mp3",
        "https://images.unsplash.com/photo-1487180144351-b8472da7d491?w=300&h=300&fit=crop",
    ),
];

/// Return the starter playlist loaded when `library.load_defaults` is set.
pub fn default_playlist() -> Vec<Track> {
    DEFAULTS
        .iter()
        .map(|&(title, secs, url, cover)| Track {
            title: title.to_string(),
            artist: ARTIST.to_string(),
            album: ALBUM.to_string(),
            duration: Some(Duration::from_secs(secs)),
            source: TrackSource::Url(url.to_string()),
            cover: cover.to_string(),
        })
        .collect()
}
