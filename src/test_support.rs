//! Fixtures shared by unit tests.

use std::time::Duration;

use crate::library::Track;
use crate::player::{MediaElement, MediaEvent};

/// Build a silent 16-bit mono PCM WAV file with `samples` frames.
pub fn wav_bytes(sample_rate: u32, samples: u32) -> Vec<u8> {
    let data_len = samples * 2;
    let mut v = Vec::with_capacity(44 + data_len as usize);
    v.extend_from_slice(b"RIFF");
    v.extend_from_slice(&(36 + data_len).to_le_bytes());
    v.extend_from_slice(b"WAVE");
    v.extend_from_slice(b"fmt ");
    v.extend_from_slice(&16u32.to_le_bytes());
    v.extend_from_slice(&1u16.to_le_bytes()); // PCM
    v.extend_from_slice(&1u16.to_le_bytes()); // mono
    v.extend_from_slice(&sample_rate.to_le_bytes());
    v.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    v.extend_from_slice(&2u16.to_le_bytes());
    v.extend_from_slice(&16u16.to_le_bytes());
    v.extend_from_slice(b"data");
    v.extend_from_slice(&data_len.to_le_bytes());
    v.resize(v.len() + data_len as usize, 0);
    v
}

/// Command recorded by [`FakeMedia`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(String),
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

/// Records commands and confirms them with the notifications the audio
/// engine sends. Nothing is delivered until a test drains `events`.
#[derive(Default)]
pub struct FakeMedia {
    pub calls: Vec<Call>,
    pub events: Vec<MediaEvent>,
    pub source: Option<String>,
    pub time: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
    playing: bool,
    ended: bool,
}

impl FakeMedia {
    pub fn plays(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Play).count()
    }

    /// The source plays out: `Ended` and nothing else.
    pub fn finish(&mut self) {
        if self.playing {
            self.playing = false;
            self.ended = true;
            self.time = self.duration.unwrap_or_default();
            self.events.push(MediaEvent::Ended);
        }
    }
}

impl MediaElement for FakeMedia {
    fn set_source(&mut self, track: &Track) {
        self.calls.push(Call::SetSource(track.title.clone()));
        self.source = Some(track.title.clone());
        self.time = Duration::ZERO;
        self.duration = track.duration;
        self.ended = false;
        if std::mem::take(&mut self.playing) {
            self.events.push(MediaEvent::Pause);
        }
    }

    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
        if self.source.is_some() && !self.playing {
            self.playing = true;
            self.ended = false;
            self.events.push(MediaEvent::Play);
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        let was_ended = std::mem::take(&mut self.ended);
        if self.playing || was_ended {
            self.playing = false;
            self.events.push(MediaEvent::Pause);
        }
    }

    fn current_time(&self) -> Duration {
        self.time
    }

    fn set_current_time(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
        self.time = position;
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, level: f32) {
        self.calls.push(Call::Volume(level));
        self.volume = level;
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}
