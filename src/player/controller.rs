use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PlaybackSettings;
use crate::library::Track;

use super::media::{MediaElement, MediaEvent};
use super::time::{TIME_PLACEHOLDER, format_duration, format_time};
use super::types::{PlaybackState, Playlist, PlaylistSink, RepeatMode};

/// Tunables for the controller, usually taken from [`PlaybackSettings`].
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Past this elapsed time, "previous" restarts the current track.
    pub restart_threshold: Duration,
    /// With repeat off, pause after the last track instead of wrapping.
    pub repeat_off_stops_at_end: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            restart_threshold: Duration::from_secs(3),
            repeat_off_stops_at_end: false,
        }
    }
}

impl From<&PlaybackSettings> for ControllerOptions {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            restart_threshold: Duration::from_secs_f64(s.restart_threshold_secs.max(0.0)),
            repeat_off_stops_at_end: s.repeat_off_stops_at_end,
        }
    }
}

/// What the progress bar and time labels currently show.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub elapsed: String,
    pub total: String,
    /// `0.0..=100.0`.
    pub percent: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            elapsed: TIME_PLACEHOLDER.to_string(),
            total: TIME_PLACEHOLDER.to_string(),
            percent: 0.0,
        }
    }
}

/// Owns the playlist and playback state and drives a [`MediaElement`].
pub struct PlaybackController<M: MediaElement> {
    playlist: Playlist,
    state: PlaybackState,
    media: M,
    progress: Progress,
    volume_percent: f64,
    options: ControllerOptions,
    rng: StdRng,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M, tracks: Vec<Track>, options: ControllerOptions) -> Self {
        let volume_percent = f64::from(media.volume()) * 100.0;
        Self {
            playlist: Playlist::new(tracks),
            state: PlaybackState::default(),
            media,
            progress: Progress::default(),
            volume_percent,
            options,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replace the shuffle RNG (deterministic tests).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn volume_percent(&self) -> f64 {
        self.volume_percent
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// The track under the current index, if the playlist is non-empty.
    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.state.current_index)
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.state.repeat_mode = mode;
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.state.shuffle = on;
    }

    /// Make `index` the current track and point the media element at it.
    ///
    /// Out-of-range indices are ignored.
    pub fn load_track(&mut self, index: usize) -> PlaybackState {
        let Some(track) = self.playlist.get(index) else {
            log::debug!("load_track({index}) ignored, playlist has {}", self.playlist.len());
            return self.state;
        };

        log::info!("loading track {index}: {}", track.title);
        self.state.current_index = index;
        self.media.set_source(track);
        self.progress = Progress {
            total: format_duration(track.duration),
            ..Progress::default()
        };
        self.state
    }

    /// Load `index` and start playing it.
    pub fn play_index(&mut self, index: usize) -> PlaybackState {
        if index < self.playlist.len() {
            self.load_track(index);
            self.media.play();
        }
        self.state
    }

    /// Pause when playing; otherwise play if a source is loaded.
    ///
    /// `is_playing` only changes once the media element confirms.
    pub fn toggle_play(&mut self) -> PlaybackState {
        if self.state.is_playing {
            self.media.pause();
        } else if self.media.has_source() {
            self.media.play();
        }
        self.state
    }

    pub fn next_track(&mut self) -> PlaybackState {
        let len = self.playlist.len();
        if len == 0 {
            return self.state;
        }

        let next = if self.state.shuffle {
            self.rng.random_range(0..len)
        } else {
            (self.state.current_index + 1) % len
        };
        self.switch_to(next)
    }

    /// Restart the current track past the threshold, else step back one.
    pub fn previous_track(&mut self) -> PlaybackState {
        let len = self.playlist.len();
        if len == 0 {
            return self.state;
        }

        if self.media.current_time() > self.options.restart_threshold {
            self.media.set_current_time(Duration::ZERO);
            self.on_time_advanced();
            return self.state;
        }

        let prev = (self.state.current_index + len - 1) % len;
        self.switch_to(prev)
    }

    fn switch_to(&mut self, index: usize) -> PlaybackState {
        let was_playing = self.state.is_playing;
        self.load_track(index);
        if was_playing {
            self.media.play();
        }
        self.state
    }

    pub fn toggle_repeat_mode(&mut self) -> PlaybackState {
        self.state.repeat_mode = self.state.repeat_mode.cycled();
        log::debug!("repeat mode: {:?}", self.state.repeat_mode);
        self.state
    }

    pub fn toggle_shuffle(&mut self) -> PlaybackState {
        self.state.shuffle = !self.state.shuffle;
        log::debug!("shuffle: {}", self.state.shuffle);
        self.state
    }

    /// Set the volume from a `0..=100` percentage.
    pub fn set_volume(&mut self, percent: f64) {
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.volume_percent = percent;
        self.media.set_volume((percent / 100.0) as f32);
    }

    /// Jump to `percent` of the track. Unknown duration seeks to the start.
    pub fn seek(&mut self, percent: f64) {
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let target = match self.media.duration() {
            Some(d) if !d.is_zero() => d.mul_f64(percent / 100.0),
            _ => Duration::ZERO,
        };
        self.media.set_current_time(target);
        self.on_time_advanced();
    }

    pub fn on_time_advanced(&mut self) {
        let current = self.media.current_time();
        self.progress.elapsed = format_time(current.as_secs_f64());
        self.progress.percent = match self.media.duration() {
            Some(d) if !d.is_zero() => {
                (current.as_secs_f64() / d.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        };
    }

    pub fn on_duration_known(&mut self) {
        self.progress.total = format_duration(self.media.duration());
    }

    pub fn on_track_ended(&mut self) {
        match self.state.repeat_mode {
            RepeatMode::RepeatOne => {
                self.media.set_current_time(Duration::ZERO);
                self.media.play();
            }
            RepeatMode::Off
                if self.options.repeat_off_stops_at_end
                    && self.state.current_index + 1 >= self.playlist.len() =>
            {
                self.media.pause();
            }
            _ => {
                self.next_track();
            }
        }
    }

    pub fn on_play(&mut self) {
        self.state.is_playing = true;
    }

    pub fn on_pause(&mut self) {
        self.state.is_playing = false;
    }

    /// Apply a media notification. Errors come back as a message to surface.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Option<String> {
        match event {
            MediaEvent::TimeUpdate => self.on_time_advanced(),
            MediaEvent::LoadedMetadata => self.on_duration_known(),
            MediaEvent::Play => self.on_play(),
            MediaEvent::Pause => self.on_pause(),
            MediaEvent::Ended => self.on_track_ended(),
            MediaEvent::Error(msg) => {
                log::error!("media error: {msg}");
                return Some(msg);
            }
        }
        None
    }
}

impl<M: MediaElement> PlaylistSink for PlaybackController<M> {
    fn append_track(&mut self, track: Track) -> usize {
        log::info!("appending track: {} - {}", track.artist, track.title);
        self.playlist.push(track)
    }
}
