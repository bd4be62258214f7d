use std::time::Duration;

use crate::library::Track;

/// Lifecycle notifications emitted by a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved.
    TimeUpdate,
    /// Duration of the current source became known.
    LoadedMetadata,
    /// Playback actually started (or resumed).
    Play,
    /// Playback actually paused.
    Pause,
    /// The current source played to its end.
    Ended,
    /// Loading, decoding or output failed.
    Error(String),
}

/// Control surface of an audio playback primitive.
///
/// Commands are fire-and-forget: the element confirms state changes through
/// [`MediaEvent`] notifications, which the owner feeds back into the
/// controller.
pub trait MediaElement {
    /// Point the element at `track`'s source. Stops whatever was playing.
    fn set_source(&mut self, track: &Track);
    fn has_source(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    fn current_time(&self) -> Duration;
    fn set_current_time(&mut self, position: Duration);
    /// `None` until the source's duration is known.
    fn duration(&self) -> Option<Duration>;
    /// Linear volume in `0.0..=1.0`.
    fn set_volume(&mut self, level: f32);
    fn volume(&self) -> f32;
}
