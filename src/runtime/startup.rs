use std::path::Path;

use crate::config;
use crate::library::{Track, default_playlist, scan};
use crate::player::{ControllerOptions, MediaElement, PlaybackController};

/// The built-in playlist (unless disabled) followed by whatever `dir` holds.
pub fn initial_tracks(dir: Option<&Path>, settings: &config::Settings) -> Vec<Track> {
    let mut tracks = if settings.library.load_defaults {
        default_playlist()
    } else {
        Vec::new()
    };
    if let Some(dir) = dir {
        tracks.extend(scan(dir, &settings.library));
    }
    tracks
}

/// Build the controller with the configured playback defaults and load the
/// first track.
pub fn build_controller<M: MediaElement>(
    media: M,
    tracks: Vec<Track>,
    settings: &config::Settings,
) -> PlaybackController<M> {
    let mut controller =
        PlaybackController::new(media, tracks, ControllerOptions::from(&settings.playback));

    // Playback defaults
    controller.set_shuffle(settings.playback.shuffle);
    controller.set_repeat_mode(settings.playback.repeat_mode.into());
    controller.set_volume(f64::from(settings.audio.volume_percent));

    controller.load_track(0);
    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepeatModeSetting;
    use crate::player::RepeatMode;
    use crate::test_support::{FakeMedia, wav_bytes};

    #[test]
    fn defaults_come_first_then_scanned_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zeta.wav"), wav_bytes(8000, 800)).unwrap();

        let settings = config::Settings::default();
        let tracks = initial_tracks(Some(dir.path()), &settings);
        assert_eq!(tracks.len(), 6);
        assert_eq!(tracks[0].title, "Sunny");
        assert_eq!(tracks[5].title, "zeta");
    }

    #[test]
    fn defaults_can_be_disabled() {
        let mut settings = config::Settings::default();
        settings.library.load_defaults = false;
        assert!(initial_tracks(None, &settings).is_empty());
    }

    #[test]
    fn controller_picks_up_playback_settings() {
        let mut settings = config::Settings::default();
        settings.playback.shuffle = true;
        settings.playback.repeat_mode = RepeatModeSetting::RepeatOne;
        settings.audio.volume_percent = 40;

        let controller = build_controller(FakeMedia::default(), default_playlist(), &settings);
        let state = controller.state();
        assert!(state.shuffle);
        assert_eq!(state.repeat_mode, RepeatMode::RepeatOne);
        assert_eq!(state.current_index, 0);
        assert!(!state.is_playing);
        assert_eq!(controller.media().volume, 0.4);
        assert_eq!(controller.media().source.as_deref(), Some("Sunny"));
    }
}
