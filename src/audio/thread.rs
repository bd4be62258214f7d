use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::blocking::Client;
use rodio::OutputStreamBuilder;

use crate::config::AudioSettings;
use crate::player::MediaEvent;

use super::engine::Engine;
use super::sink::RodioOutput;
use super::types::{AudioCmd, PlaybackHandle};

const TICK: Duration = Duration::from_millis(250);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    loopback: Sender<AudioCmd>,
    events: Sender<MediaEvent>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                log::error!("no audio output device: {e}");
                let _ = events.send(MediaEvent::Error(format!("No audio output device: {e}")));
                return;
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(audio_settings.fetch_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("falling back to a default HTTP client: {e}");
                Client::new()
            });

        let mut engine = Engine::new(
            RodioOutput::new(stream),
            client,
            loopback,
            events,
            playback_info,
        );

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd @ AudioCmd::Quit { .. }) => {
                    engine.handle(cmd);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!("audio thread finished");
    })
}
