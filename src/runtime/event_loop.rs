use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Mode, TaskRequest};
use crate::config;
use crate::player::{MediaElement, MediaEvent};
use crate::ui;

use super::tasks::TaskWorker;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: feeds media notifications and worker answers
/// into the app, draws, and handles input. Returns `Ok(())` when shutdown is
/// requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<M>,
    media_events: &Receiver<MediaEvent>,
    worker: &TaskWorker,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(event) = media_events.try_recv() {
            app.handle_media_event(event);
        }
        while let Some(result) = worker.try_recv() {
            app.apply_task_result(result);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, app, state) {
                    Some(Request::Quit) => break,
                    Some(Request::Task(task)) => worker.submit(task),
                    None => {}
                }
            }
        }
    }

    Ok(())
}

/// What a key press asks of the loop beyond mutating the app.
#[derive(Debug, PartialEq)]
pub enum Request {
    Quit,
    Task(TaskRequest),
}

/// Route one key press. An open alert swallows the key and closes.
pub fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    app: &mut App<M>,
    state: &mut EventLoopState,
) -> Option<Request> {
    if app.dismiss_alert() {
        state.pending_gg = false;
        return None;
    }

    match app.mode {
        Mode::SearchInput => {
            state.pending_gg = false;
            handle_search_input(key, app)
        }
        Mode::Results => {
            state.pending_gg = false;
            handle_results(key, app);
            None
        }
        Mode::AddFile => {
            state.pending_gg = false;
            handle_add_file(key, app)
        }
        Mode::Normal => handle_normal(key, app, state),
    }
}

fn handle_search_input<M: MediaElement>(key: KeyEvent, app: &mut App<M>) -> Option<Request> {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => return app.submit_search().map(Request::Task),
        KeyCode::Backspace => {
            app.search.query.pop();
        }
        KeyCode::Tab => {
            app.mode = Mode::Normal;
            app.enter_results();
        }
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.search.query.push(c);
            }
        }
        _ => {}
    }
    None
}

fn handle_results<M: MediaElement>(key: KeyEvent, app: &mut App<M>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.search.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.search.select_prev(),
        KeyCode::Enter => app.add_selected_result(),
        KeyCode::Esc | KeyCode::Tab => app.mode = Mode::Normal,
        KeyCode::Char('/') => app.enter_search(),
        _ => {}
    }
}

fn handle_add_file<M: MediaElement>(key: KeyEvent, app: &mut App<M>) -> Option<Request> {
    match key.code {
        KeyCode::Esc => {
            app.path_input.clear();
            app.mode = Mode::Normal;
        }
        KeyCode::Enter => return app.submit_add_file().map(Request::Task),
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.path_input.push(c);
            }
        }
        _ => {}
    }
    None
}

fn handle_normal<M: MediaElement>(
    key: KeyEvent,
    app: &mut App<M>,
    state: &mut EventLoopState,
) -> Option<Request> {
    if key.code == KeyCode::Char('g') {
        if state.pending_gg {
            state.pending_gg = false;
            app.select_first();
        } else {
            state.pending_gg = true;
        }
        return None;
    }
    state.pending_gg = false;

    match key.code {
        KeyCode::Char('q') => return Some(Request::Quit),
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if app.has_tracks() {
                app.play_selected();
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_play(),
        KeyCode::Char('l') => app.next_track(),
        KeyCode::Char('h') => app.previous_track(),
        KeyCode::Char('L') => app.seek_step(true),
        KeyCode::Char('H') => app.seek_step(false),
        KeyCode::Char(c @ '0'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.seek_to_tenth(digit);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_step(true),
        KeyCode::Char('-') => app.volume_step(false),
        KeyCode::Char('r') => {
            let mode = app.controller.toggle_repeat_mode().repeat_mode;
            log::info!("repeat mode: {}", mode.label());
        }
        KeyCode::Char('s') => {
            let shuffle = app.controller.toggle_shuffle().shuffle;
            log::info!("shuffle: {shuffle}");
        }
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Tab => app.enter_results(),
        KeyCode::Char('T') => return Some(Request::Task(app.request_top_tracks())),
        KeyCode::Char('a') => app.enter_add_file(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }
    None
}
