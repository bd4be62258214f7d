use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub catalog: CatalogSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial volume, 0-100.
    pub volume_percent: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Timeout for fetching remote audio (seconds).
    pub fetch_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume_percent: 80,
            quit_fade_out_ms: 500,
            fetch_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the playlist cursor starts in "follow playback" mode.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields make up the "now playing" line, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,

    /// Which track fields make up a playlist row.
    pub playlist_fields: Vec<TrackDisplayField>,

    /// Separator used to join `playlist_fields`.
    pub playlist_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ encore: play it again ~ ".to_string(),
            now_playing_track_fields: vec![TrackDisplayField::Title],
            now_playing_track_separator: " - ".to_string(),
            playlist_fields: vec![TrackDisplayField::Title, TrackDisplayField::Artist],
            playlist_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change per `-` / `+` press, in percent.
    pub volume_step: u8,
    /// Progress change per `H` / `L` press, in percent of the track.
    pub seek_step_percent: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 5,
            seek_step_percent: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Initial repeat mode.
    pub repeat_mode: RepeatModeSetting,
    /// Past this many seconds, "previous" restarts the current track instead.
    pub restart_threshold_secs: f64,
    /// With repeat off, pause after the last track instead of wrapping.
    pub repeat_off_stops_at_end: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat_mode: RepeatModeSetting::Off,
            restart_threshold_secs: 3.0,
            repeat_off_stops_at_end: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "none", alias = "no-repeat", alias = "no_repeat")]
    Off,
    #[serde(
        alias = "all",
        alias = "repeat_all",
        alias = "repeatall",
        alias = "playlist"
    )]
    RepeatAll,
    #[serde(
        alias = "one",
        alias = "repeat_one",
        alias = "repeatone",
        alias = "track"
    )]
    RepeatOne,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    /// URL, file path, or in-memory marker.
    Source,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Start with the built-in playlist.
    pub load_defaults: bool,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Artist used when a file carries no tag.
    pub placeholder_artist: String,
    /// Album used when a file carries no tag.
    pub placeholder_album: String,
    /// Cover URI for local files.
    pub placeholder_cover: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            load_defaults: true,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            placeholder_artist: "Unknown Artist".to_string(),
            placeholder_album: "My Music".to_string(),
            placeholder_cover: "https://via.placeholder.com/300?text=Album".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Base URL of the catalog backend; `/search/{q}` etc. are appended.
    pub api_base: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
    /// Shortest accepted search query, counted in characters after trimming.
    pub min_query_chars: usize,
    /// Cover URI used when a search result has none.
    pub default_cover: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000/api".to_string(),
            timeout_secs: 10,
            min_query_chars: 2,
            default_cover: "assets/default-album.svg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
    /// Directory holding `index.html` and the assets it references.
    pub root: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter, e.g. `info` or `encore=debug`. `RUST_LOG` wins.
    pub level: String,
    /// Log file for the player. Defaults to the XDG state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
