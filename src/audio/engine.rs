//! State machine of the audio thread.
//!
//! Notifications follow the media element contract: `Play` as soon as
//! playback is requested (even while the source is still loading), `Pause`
//! whenever a playing or just-ended element stops, and `Ended` alone when the
//! source runs out.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::library::TrackSource;
use crate::player::MediaEvent;

use super::fetch::{SourceError, read_source};
use super::sink::{Output, Playback, resolve_duration};
use super::types::{AudioCmd, PlaybackHandle};

/// Everything the audio thread owns.
pub(super) struct Engine<O: Output> {
    output: O,
    client: Client,
    /// Loader threads report back through the command channel.
    loopback: Sender<AudioCmd>,
    events: Sender<MediaEvent>,
    info: PlaybackHandle,

    sink: Option<O::Sink>,
    bytes: Option<Arc<[u8]>>,
    /// Bumped on every load; results for older generations are dropped.
    generation: u64,
    loading: bool,
    play_when_ready: bool,
    pending_seek: Option<Duration>,
    duration_hint: Option<Duration>,
    duration: Option<Duration>,
    /// Offset of the sink's source when it was rebuilt with `skip_duration`.
    base: Duration,
    /// Playback requested and confirmed with `Play`, possibly still loading.
    playing: bool,
    /// The source played out and nobody has paused or replayed it yet.
    ended: bool,
    volume: f32,
}

impl<O: Output> Engine<O> {
    pub(super) fn new(
        output: O,
        client: Client,
        loopback: Sender<AudioCmd>,
        events: Sender<MediaEvent>,
        info: PlaybackHandle,
    ) -> Self {
        let volume = info.lock().map(|i| i.volume).unwrap_or(1.0);
        Self {
            output,
            client,
            loopback,
            events,
            info,
            sink: None,
            bytes: None,
            generation: 0,
            loading: false,
            play_when_ready: false,
            pending_seek: None,
            duration_hint: None,
            duration: None,
            base: Duration::ZERO,
            playing: false,
            ended: false,
            volume,
        }
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load {
                source,
                duration_hint,
            } => self.load(source, duration_hint),
            AudioCmd::SourceReady { generation, result } => self.source_ready(generation, result),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetVolume(v) => {
                self.volume = v;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(v);
                }
            }
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(event);
    }

    fn load(&mut self, source: TrackSource, duration_hint: Option<Duration>) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        if std::mem::take(&mut self.playing) {
            self.emit(MediaEvent::Pause);
        }

        self.generation += 1;
        self.bytes = None;
        self.loading = true;
        self.ended = false;
        self.play_when_ready = false;
        self.pending_seek = None;
        self.duration_hint = duration_hint;
        self.duration = duration_hint;
        self.base = Duration::ZERO;
        self.set_has_source(true);
        self.publish(Duration::ZERO);

        let generation = self.generation;
        log::debug!("loading {} (generation {generation})", source.describe());

        if let TrackSource::Bytes(bytes) = &source {
            self.source_ready(generation, Ok(Arc::clone(bytes)));
            return;
        }

        let tx = self.loopback.clone();
        let client = self.client.clone();
        thread::spawn(move || {
            let result = read_source(&source, &client);
            let _ = tx.send(AudioCmd::SourceReady { generation, result });
        });
    }

    fn source_ready(&mut self, generation: u64, result: Result<Arc<[u8]>, SourceError>) {
        if generation != self.generation {
            log::debug!("dropping stale source (generation {generation})");
            return;
        }
        self.loading = false;

        let bytes = match result {
            Ok(b) => b,
            Err(e) => {
                log::error!("failed to load source: {e}");
                self.fail(format!("Could not load track: {e}"));
                return;
            }
        };

        let start = self.pending_seek.take().unwrap_or(Duration::ZERO);
        let (sink, decoded) = match self.output.open(Arc::clone(&bytes), start) {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("{e}");
                self.fail(format!("Could not play track: {e}"));
                return;
            }
        };
        sink.set_volume(self.volume);
        if std::mem::take(&mut self.play_when_ready) {
            sink.play();
        }

        self.duration = resolve_duration(decoded, &bytes, self.duration_hint);
        self.bytes = Some(bytes);
        self.sink = Some(sink);
        self.base = start;
        self.publish(start);
        self.emit(MediaEvent::LoadedMetadata);
    }

    /// The current source cannot be played. Undo a pending play.
    fn fail(&mut self, message: String) {
        self.play_when_ready = false;
        self.set_has_source(false);
        self.emit(MediaEvent::Error(message));
        if std::mem::take(&mut self.playing) {
            self.emit(MediaEvent::Pause);
        }
    }

    fn play(&mut self) {
        if self.playing {
            return;
        }
        if self.sink.is_none() {
            if !self.loading {
                log::debug!("play ignored, no source");
                return;
            }
            self.play_when_ready = true;
        }

        if std::mem::take(&mut self.ended) {
            // Replaying a finished source starts it over.
            self.seek_to(Duration::ZERO);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.playing = true;
        self.emit(MediaEvent::Play);
    }

    fn pause(&mut self) {
        self.play_when_ready = false;
        let was_ended = std::mem::take(&mut self.ended);
        if !self.playing && !was_ended {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.playing = false;
        self.emit(MediaEvent::Pause);
    }

    fn seek(&mut self, position: Duration) {
        let position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };

        if self.sink.is_none() {
            if self.loading {
                self.pending_seek = Some(position);
            }
            return;
        }

        if self.seek_to(position) {
            self.publish(position);
            self.emit(MediaEvent::TimeUpdate);
        }
    }

    /// Move the loaded source to `position`, rebuilding the sink when it
    /// cannot seek in place.
    fn seek_to(&mut self, position: Duration) -> bool {
        let seeked = self.base.is_zero()
            && self
                .sink
                .as_ref()
                .is_some_and(|s| !s.is_empty() && s.try_seek(position));
        if seeked {
            return true;
        }

        // Scrubbing fallback: rebuild the sink and skip into the buffer.
        let Some(bytes) = self.bytes.clone() else {
            return false;
        };
        match self.output.open(bytes, position) {
            Ok((new_sink, _)) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                new_sink.set_volume(self.volume);
                if self.playing {
                    new_sink.play();
                }
                self.sink = Some(new_sink);
                self.base = position;
                true
            }
            Err(e) => {
                log::error!("seek failed: {e}");
                self.emit(MediaEvent::Error(format!("Seek failed: {e}")));
                false
            }
        }
    }

    /// Periodic position update and end-of-stream detection.
    pub(super) fn tick(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        let mut position = self.base + s.position();
        if let Some(d) = self.duration {
            position = position.min(d);
        }
        let ended = self.playing && s.is_empty();

        self.publish(position);
        if self.playing {
            self.emit(MediaEvent::TimeUpdate);
        }
        if ended {
            // No Pause here: the owner decides whether playback continues.
            self.playing = false;
            self.ended = true;
            self.emit(MediaEvent::Ended);
        }
    }

    fn set_has_source(&self, has_source: bool) {
        if let Ok(mut info) = self.info.lock() {
            info.has_source = has_source;
        }
    }

    fn publish(&self, position: Duration) {
        if let Ok(mut info) = self.info.lock() {
            info.position = position;
            info.duration = self.duration;
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            if self.playing {
                // Fade out gently before stopping.
                fade_out_sink(&s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        self.playing = false;
    }
}

fn fade_out_sink<P: Playback>(sink: &P, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
