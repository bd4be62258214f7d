//! Utilities for creating `rodio` sinks from in-memory audio.
//!
//! The engine talks to its output through [`Output`] and [`Playback`], so
//! the rodio types stay at the edge of the audio thread.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::probe_duration;

use super::fetch::SourceError;

/// What the engine needs from a sink.
pub(super) trait Playback {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, level: f32);
    /// In-place seek. Returns false when the source cannot seek.
    fn try_seek(&self, position: Duration) -> bool;
    /// Position within the appended source.
    fn position(&self) -> Duration;
    /// Whether the source has played out.
    fn is_empty(&self) -> bool;
}

impl Playback for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn set_volume(&self, level: f32) {
        Sink::set_volume(self, level);
    }

    fn try_seek(&self, position: Duration) -> bool {
        Sink::try_seek(self, position).is_ok()
    }

    fn position(&self) -> Duration {
        self.get_pos()
    }

    fn is_empty(&self) -> bool {
        self.empty()
    }
}

/// Builds paused sinks for decoded sources.
pub(super) trait Output {
    type Sink: Playback;

    /// Decode `bytes` into a paused sink starting at `start_at`. Also returns
    /// the duration the decoder reports, if any.
    fn open(
        &self,
        bytes: Arc<[u8]>,
        start_at: Duration,
    ) -> Result<(Self::Sink, Option<Duration>), SourceError>;
}

/// The default output device.
pub(super) struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    pub(super) fn new(mut stream: OutputStream) -> Self {
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        Self { stream }
    }
}

impl Output for RodioOutput {
    type Sink = Sink;

    fn open(
        &self,
        bytes: Arc<[u8]>,
        start_at: Duration,
    ) -> Result<(Sink, Option<Duration>), SourceError> {
        create_sink_at(&self.stream, bytes, start_at)
    }
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the duration the decoder reports, if any.
fn create_sink_at(
    stream: &OutputStream,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), SourceError> {
    let decoder =
        Decoder::new(Cursor::new(bytes)).map_err(|e| SourceError::Decode(e.to_string()))?;
    let total = decoder.total_duration();

    // `skip_duration` is our fallback seeking primitive; Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Pick the best known duration: decoder, then container probe, then hint.
pub(super) fn resolve_duration(
    decoded: Option<Duration>,
    bytes: &[u8],
    hint: Option<Duration>,
) -> Option<Duration> {
    decoded
        .filter(|d| !d.is_zero())
        .or_else(|| probe_duration(bytes).ok().filter(|d| !d.is_zero()))
        .or(hint)
}
