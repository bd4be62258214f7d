use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::library::Track;
use crate::player::{MediaElement, MediaEvent};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// The real media element: commands go to the audio thread, reads come from
/// the shared playback snapshot.
pub struct AudioElement {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioElement {
    /// Spawn the audio thread. Notifications arrive on the returned receiver.
    pub fn new(audio_settings: AudioSettings) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            volume: f32::from(audio_settings.volume_percent.min(100)) / 100.0,
            ..PlaybackInfo::default()
        }));

        let audio_handle = spawn_audio_thread(
            rx,
            tx.clone(),
            events_tx,
            playback_info.clone(),
            audio_settings,
        );

        let element = Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        };
        (element, events_rx)
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            log::debug!("audio thread is gone, command dropped");
        }
    }

    fn info(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }

    /// Fade out over `fade_out` and wait for the audio thread to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for AudioElement {
    fn drop(&mut self) {
        // The thread keeps a sender for its loaders, so it never sees a disconnect.
        self.quit_softly(Duration::ZERO);
    }
}

impl MediaElement for AudioElement {
    fn set_source(&mut self, track: &Track) {
        if let Ok(mut info) = self.playback.lock() {
            info.has_source = true;
            info.position = Duration::ZERO;
            info.duration = track.duration;
        }
        self.send(AudioCmd::Load {
            source: track.source.clone(),
            duration_hint: track.duration,
        });
    }

    fn has_source(&self) -> bool {
        self.info().has_source
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn current_time(&self) -> Duration {
        self.info().position
    }

    fn set_current_time(&mut self, position: Duration) {
        if let Ok(mut info) = self.playback.lock() {
            info.position = match info.duration {
                Some(d) => position.min(d),
                None => position,
            };
        }
        self.send(AudioCmd::Seek(position));
    }

    fn duration(&self) -> Option<Duration> {
        self.info().duration
    }

    fn set_volume(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        if let Ok(mut info) = self.playback.lock() {
            info.volume = level;
        }
        self.send(AudioCmd::SetVolume(level));
    }

    fn volume(&self) -> f32 {
        self.info().volume
    }
}
