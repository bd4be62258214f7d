use std::path::PathBuf;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioElement;
use crate::catalog::HttpCatalog;
use crate::config;

mod event_loop;
mod logging;
mod settings;
mod startup;
mod tasks;

pub use logging::{init_stderr, level_for};
pub use settings::load_settings;

/// Run the terminal player until the user quits.
pub fn run(
    dir: Option<PathBuf>,
    settings: &config::Settings,
    verbosity: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_file(&settings.logging, &level_for(&settings.logging, verbosity));

    let tracks = startup::initial_tracks(dir.as_deref(), settings);
    log::info!("starting with {} tracks", tracks.len());

    let catalog = HttpCatalog::new(&settings.catalog)?;
    let worker = tasks::TaskWorker::spawn(catalog, settings.library.clone());

    let (media, media_events) = AudioElement::new(settings.audio.clone());
    let controller = startup::build_controller(media, tracks, settings);
    let mut app = App::new(
        controller,
        settings.catalog.clone(),
        settings.controls.clone(),
    );

    app.follow_playback = settings.ui.follow_playback;
    if let Some(dir) = &dir {
        app.set_current_dir(dir.display().to_string());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            settings,
            &mut app,
            &media_events,
            &worker,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.controller
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    log::info!("bye");

    run_result
}
