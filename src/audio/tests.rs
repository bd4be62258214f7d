use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::blocking::Client;
use rouille::{Response, Server};

use super::engine::Engine;
use super::sink::{Output, Playback, resolve_duration};
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};
use super::{SourceError, read_source};
use crate::library::TrackSource;
use crate::player::MediaEvent;
use crate::test_support::wav_bytes;

#[test]
fn bytes_source_is_shared_not_copied() {
    let bytes: Arc<[u8]> = Arc::from(vec![1u8, 2, 3]);
    let out = read_source(&TrackSource::Bytes(bytes.clone()), &Client::new()).unwrap();
    assert!(Arc::ptr_eq(&bytes, &out));
}

#[test]
fn file_source_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.wav");
    std::fs::write(&path, b"abc").unwrap();

    let out = read_source(&TrackSource::File(path), &Client::new()).unwrap();
    assert_eq!(&out[..], b"abc");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_source(
        &TrackSource::File(dir.path().join("nope.mp3")),
        &Client::new(),
    )
    .unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn url_source_fetches_body_and_rejects_bad_status() {
    let server = Server::new("127.0.0.1:0", |request| match request.url().as_str() {
        "/ok.wav" => Response::from_data("audio/wav", b"RIFF".to_vec()),
        _ => Response::empty_404(),
    })
    .unwrap();
    let addr = server.server_addr();
    let (handle, stop) = server.stoppable();

    let client = Client::new();
    let ok = read_source(&TrackSource::Url(format!("http://{addr}/ok.wav")), &client).unwrap();
    assert_eq!(&ok[..], b"RIFF");

    let err = read_source(&TrackSource::Url(format!("http://{addr}/gone.mp3")), &client)
        .unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 404, .. }));

    let _ = stop.send(());
    let _ = handle.join();
}

#[test]
fn duration_prefers_decoder_then_probe_then_hint() {
    let wav = wav_bytes(8000, 16000);
    let hint = Some(Duration::from_secs(99));

    assert_eq!(
        resolve_duration(Some(Duration::from_secs(5)), &wav, hint),
        Some(Duration::from_secs(5))
    );

    let probed = resolve_duration(None, &wav, hint).unwrap();
    assert!((probed.as_millis() as i64 - 2000).abs() <= 5);

    assert_eq!(resolve_duration(None, b"not audio", hint), hint);
    assert_eq!(resolve_duration(Some(Duration::ZERO), b"not audio", None), None);
}

#[derive(Debug, Default)]
struct SinkState {
    playing: bool,
    stopped: bool,
    position: Duration,
    empty: bool,
}

#[derive(Clone, Default)]
struct FakeSink(Arc<Mutex<SinkState>>);

impl FakeSink {
    fn state(&self) -> std::sync::MutexGuard<'_, SinkState> {
        self.0.lock().unwrap()
    }
}

impl Playback for FakeSink {
    fn play(&self) {
        self.state().playing = true;
    }

    fn pause(&self) {
        self.state().playing = false;
    }

    fn stop(&self) {
        let mut s = self.state();
        s.playing = false;
        s.stopped = true;
    }

    fn set_volume(&self, _level: f32) {}

    fn try_seek(&self, _position: Duration) -> bool {
        false
    }

    fn position(&self) -> Duration {
        self.state().position
    }

    fn is_empty(&self) -> bool {
        self.state().empty
    }
}

/// Hands out fake sinks that cannot seek in place, so every seek rebuilds.
#[derive(Default)]
struct FakeOutput {
    undecodable: bool,
    opened: Arc<Mutex<Vec<(FakeSink, Duration)>>>,
}

impl Output for FakeOutput {
    type Sink = FakeSink;

    fn open(
        &self,
        _bytes: Arc<[u8]>,
        start_at: Duration,
    ) -> Result<(FakeSink, Option<Duration>), SourceError> {
        if self.undecodable {
            return Err(SourceError::Decode("unsupported format".into()));
        }
        let sink = FakeSink::default();
        self.opened.lock().unwrap().push((sink.clone(), start_at));
        Ok((sink, Some(Duration::from_secs(10))))
    }
}

struct Rig {
    engine: Engine<FakeOutput>,
    events: Receiver<MediaEvent>,
    loopback: Receiver<AudioCmd>,
    info: PlaybackHandle,
    opened: Arc<Mutex<Vec<(FakeSink, Duration)>>>,
    dir: tempfile::TempDir,
}

impl Rig {
    fn new(output: FakeOutput) -> Self {
        let (loop_tx, loopback) = mpsc::channel();
        let (events_tx, events) = mpsc::channel();
        let info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let opened = Arc::clone(&output.opened);
        let engine = Engine::new(output, Client::new(), loop_tx, events_tx, Arc::clone(&info));
        Self {
            engine,
            events,
            loopback,
            info,
            opened,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn events(&self) -> Vec<MediaEvent> {
        self.events.try_iter().collect()
    }

    fn load(&mut self, source: TrackSource) {
        self.engine.handle(AudioCmd::Load {
            source,
            duration_hint: None,
        });
    }

    /// A file source; the loader thread reads it in the background.
    fn wav_file(&self, name: &str) -> TrackSource {
        let path = self.dir.path().join(name);
        std::fs::write(&path, wav_bytes(8000, 8000)).unwrap();
        TrackSource::File(path)
    }

    fn missing_file(&self) -> TrackSource {
        TrackSource::File(self.dir.path().join("missing.mp3"))
    }

    /// Hand the next loader result to the engine.
    fn deliver_load(&mut self) {
        let cmd = self.loopback.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(cmd, AudioCmd::SourceReady { .. }));
        self.engine.handle(cmd);
    }

    fn sinks(&self) -> Vec<(FakeSink, Duration)> {
        self.opened.lock().unwrap().clone()
    }

    fn has_source(&self) -> bool {
        self.info.lock().unwrap().has_source
    }
}

fn bytes_source() -> TrackSource {
    TrackSource::Bytes(Arc::from(wav_bytes(8000, 8000)))
}

#[test]
fn play_is_confirmed_while_the_source_loads() {
    let mut rig = Rig::new(FakeOutput::default());
    let source = rig.wav_file("a.wav");
    rig.load(source);
    rig.engine.handle(AudioCmd::Play);
    assert_eq!(rig.events(), vec![MediaEvent::Play]);
    assert!(rig.sinks().is_empty());

    rig.deliver_load();
    assert_eq!(rig.events(), vec![MediaEvent::LoadedMetadata]);
    let sinks = rig.sinks();
    assert_eq!(sinks.len(), 1);
    assert!(sinks[0].0.state().playing);
}

#[test]
fn skipping_again_before_the_source_arrives_keeps_playing() {
    let mut rig = Rig::new(FakeOutput::default());
    rig.load(bytes_source());
    rig.engine.handle(AudioCmd::Play);
    assert_eq!(
        rig.events(),
        vec![MediaEvent::LoadedMetadata, MediaEvent::Play]
    );

    for name in ["b.wav", "c.wav"] {
        let source = rig.wav_file(name);
        rig.load(source);
        rig.engine.handle(AudioCmd::Play);
    }
    assert_eq!(
        rig.events(),
        vec![
            MediaEvent::Pause,
            MediaEvent::Play,
            MediaEvent::Pause,
            MediaEvent::Play
        ]
    );

    // Both loaders answer; only the newest generation gets a sink.
    rig.deliver_load();
    rig.deliver_load();
    assert_eq!(rig.events(), vec![MediaEvent::LoadedMetadata]);
    let sinks = rig.sinks();
    assert_eq!(sinks.len(), 2);
    assert!(sinks[0].0.state().stopped);
    assert!(sinks[1].0.state().playing);
}

#[test]
fn stale_load_result_is_dropped() {
    let mut rig = Rig::new(FakeOutput::default());
    let missing = rig.missing_file();
    rig.load(missing);
    rig.load(bytes_source());
    assert_eq!(rig.events(), vec![MediaEvent::LoadedMetadata]);

    // The failed read belongs to the first load and must not surface.
    rig.deliver_load();
    assert!(rig.events().is_empty());
    assert!(rig.has_source());
    assert_eq!(rig.sinks().len(), 1);
}

#[test]
fn ended_comes_alone_and_a_pause_confirms_it() {
    let mut rig = Rig::new(FakeOutput::default());
    rig.load(bytes_source());
    rig.engine.handle(AudioCmd::Play);
    rig.events();

    rig.sinks()[0].0.state().empty = true;
    rig.engine.tick();
    assert_eq!(rig.events(), vec![MediaEvent::TimeUpdate, MediaEvent::Ended]);

    rig.engine.handle(AudioCmd::Pause);
    assert_eq!(rig.events(), vec![MediaEvent::Pause]);
    rig.engine.handle(AudioCmd::Pause);
    assert!(rig.events().is_empty());
}

#[test]
fn playing_an_ended_source_starts_over() {
    let mut rig = Rig::new(FakeOutput::default());
    rig.load(bytes_source());
    rig.engine.handle(AudioCmd::Play);
    rig.sinks()[0].0.state().empty = true;
    rig.engine.tick();
    rig.events();

    rig.engine.handle(AudioCmd::Play);
    assert_eq!(rig.events(), vec![MediaEvent::Play]);
    let sinks = rig.sinks();
    assert_eq!(sinks.len(), 2);
    assert_eq!(sinks[1].1, Duration::ZERO);
    assert!(sinks[1].0.state().playing);
}

#[test]
fn seek_rebuilds_the_sink_when_it_cannot_seek_in_place() {
    let mut rig = Rig::new(FakeOutput::default());
    rig.load(bytes_source());
    rig.engine.handle(AudioCmd::Play);
    rig.events();

    rig.engine.handle(AudioCmd::Seek(Duration::from_secs(3)));
    assert_eq!(rig.events(), vec![MediaEvent::TimeUpdate]);
    let sinks = rig.sinks();
    assert_eq!(sinks.len(), 2);
    assert!(sinks[0].0.state().stopped);
    assert_eq!(sinks[1].1, Duration::from_secs(3));
    assert!(sinks[1].0.state().playing);

    // Reported position counts from the skip offset.
    sinks[1].0.state().position = Duration::from_secs(1);
    rig.engine.tick();
    assert_eq!(rig.info.lock().unwrap().position, Duration::from_secs(4));
}

#[test]
fn seek_while_loading_applies_once_ready() {
    let mut rig = Rig::new(FakeOutput::default());
    let source = rig.wav_file("a.wav");
    rig.load(source);
    rig.engine.handle(AudioCmd::Seek(Duration::from_secs(2)));
    rig.deliver_load();
    assert_eq!(rig.sinks()[0].1, Duration::from_secs(2));
}

#[test]
fn failed_load_reports_error_and_undoes_pending_play() {
    let mut rig = Rig::new(FakeOutput::default());
    let missing = rig.missing_file();
    rig.load(missing);
    rig.engine.handle(AudioCmd::Play);
    assert_eq!(rig.events(), vec![MediaEvent::Play]);

    rig.deliver_load();
    let events = rig.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], MediaEvent::Error(msg) if msg.starts_with("Could not load track")));
    assert_eq!(events[1], MediaEvent::Pause);
    assert!(!rig.has_source());

    rig.engine.handle(AudioCmd::Play);
    assert!(rig.events().is_empty());
}

#[test]
fn undecodable_source_is_an_error() {
    let mut rig = Rig::new(FakeOutput {
        undecodable: true,
        ..FakeOutput::default()
    });
    rig.load(bytes_source());
    let events = rig.events();
    assert!(matches!(&events[..], [MediaEvent::Error(msg)] if msg.contains("unsupported format")));
    assert!(!rig.has_source());
}
