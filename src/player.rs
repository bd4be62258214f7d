//! Playback controller: the playlist, the playback state and the
//! translation of user intents and media notifications into commands for a
//! [`MediaElement`].
//!
//! The controller holds no rendering code. Every transport operation returns
//! the resulting [`PlaybackState`]; the UI reads [`PlaybackController::progress`]
//! and friends when it draws.

mod controller;
mod media;
mod time;
mod types;

pub use controller::{ControllerOptions, PlaybackController, Progress};
pub use media::{MediaElement, MediaEvent};
pub use time::{format_duration, format_time};
pub use types::{PlaybackState, Playlist, PlaylistSink, RepeatMode};
