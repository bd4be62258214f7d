//! Application model types: `App` and `Mode`.
//!
//! The `App` struct owns the playback controller and holds the cursor,
//! input buffers and alerts used by the UI and runtime.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::catalog::{self, SearchPanel};
use crate::config::{CatalogSettings, ControlsSettings};
use crate::notice::Notice;
use crate::player::{MediaElement, MediaEvent, PlaybackController, PlaylistSink};

use super::task::{TaskRequest, TaskResult};

const FILE_ADDED: &str = "Song added successfully!";

/// Which part of the screen receives key presses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Playlist navigation and transport keys.
    #[default]
    Normal,
    /// Typing a catalog query.
    SearchInput,
    /// Browsing the catalog result list.
    Results,
    /// Typing the path of a local file to add.
    AddFile,
}

/// The main application model.
pub struct App<M: MediaElement> {
    pub controller: PlaybackController<M>,
    pub search: SearchPanel,
    pub mode: Mode,

    /// Playlist cursor.
    pub selected: usize,
    pub follow_playback: bool,

    pub path_input: String,
    pub current_dir: Option<String>,
    pub metadata_window: bool,

    alerts: VecDeque<Notice>,
    catalog: CatalogSettings,
    controls: ControlsSettings,
}

impl<M: MediaElement> App<M> {
    pub fn new(
        controller: PlaybackController<M>,
        catalog: CatalogSettings,
        controls: ControlsSettings,
    ) -> Self {
        let selected = controller.state().current_index;
        Self {
            controller,
            search: SearchPanel::new(),
            mode: Mode::Normal,

            selected,
            follow_playback: true,

            path_input: String::new(),
            current_dir: None,
            metadata_window: false,

            alerts: VecDeque::new(),
            catalog,
            controls,
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Queue an alert behind any that are already showing.
    pub fn alert(&mut self, notice: Notice) {
        log::info!("alert: {}", notice.text);
        self.alerts.push_back(notice);
    }

    /// The alert currently blocking input, if any.
    pub fn current_alert(&self) -> Option<&Notice> {
        self.alerts.front()
    }

    /// Drop the front alert. Returns false when there was none.
    pub fn dismiss_alert(&mut self) -> bool {
        self.alerts.pop_front().is_some()
    }

    /// Enable following playback (cursor follows the current track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.sync_follow();
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Snap the cursor to the current track when following playback.
    pub fn sync_follow(&mut self) {
        if self.follow_playback && !self.controller.playlist().is_empty() {
            self.selected = self.controller.state().current_index;
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.controller.playlist().is_empty()
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.controller.playlist().len();
        if len > 0 {
            self.follow_playback_off();
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.controller.playlist().len();
        if len > 0 {
            self.follow_playback_off();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        if self.has_tracks() {
            self.follow_playback_off();
            self.selected = 0;
        }
    }

    pub fn select_last(&mut self) {
        let len = self.controller.playlist().len();
        if len > 0 {
            self.follow_playback_off();
            self.selected = len - 1;
        }
    }

    pub fn play_selected(&mut self) {
        self.controller.play_index(self.selected);
        self.follow_playback_on();
    }

    pub fn toggle_play(&mut self) {
        self.controller.toggle_play();
    }

    pub fn next_track(&mut self) {
        self.controller.next_track();
        self.follow_playback_on();
    }

    pub fn previous_track(&mut self) {
        self.controller.previous_track();
        self.follow_playback_on();
    }

    /// Seek one step forward or back, in percent of the track.
    pub fn seek_step(&mut self, forward: bool) {
        let step = f64::from(self.controls.seek_step_percent);
        let current = self.controller.progress().percent;
        let target = if forward { current + step } else { current - step };
        self.controller.seek(target);
    }

    /// Seek to `digit` tenths of the track (`0` is the start).
    pub fn seek_to_tenth(&mut self, digit: u32) {
        self.controller.seek(f64::from(digit.min(9)) * 10.0);
    }

    pub fn volume_step(&mut self, up: bool) {
        let step = f64::from(self.controls.volume_step);
        let current = self.controller.volume_percent();
        let target = if up { current + step } else { current - step };
        self.controller.set_volume(target);
    }

    /// Apply a media notification, turning errors into alerts.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if let Some(message) = self.controller.handle_media_event(event) {
            self.alert(Notice::error(message));
        }
        self.sync_follow();
    }

    pub fn enter_search(&mut self) {
        self.mode = Mode::SearchInput;
    }

    /// Validate the typed query and hand back the lookup to run.
    ///
    /// Invalid queries raise an alert and never leave the app.
    pub fn submit_search(&mut self) -> Option<TaskRequest> {
        let query = match catalog::validate_query(&self.search.query, self.catalog.min_query_chars) {
            Ok(q) => q.to_string(),
            Err(e) => {
                self.alert(Notice::error(e.user_message()));
                return None;
            }
        };
        self.mode = Mode::Normal;
        let ticket = self.search.begin();
        Some(TaskRequest::Search { ticket, query })
    }

    pub fn request_top_tracks(&mut self) -> TaskRequest {
        TaskRequest::TopTracks {
            ticket: self.search.begin(),
        }
    }

    /// Show the result list when there is something to browse.
    pub fn enter_results(&mut self) {
        if !self.search.results().is_empty() {
            self.mode = Mode::Results;
        }
    }

    /// Add the highlighted search result to the playlist.
    pub fn add_selected_result(&mut self) {
        let Some(result) = self.search.selected_result().cloned() else {
            return;
        };
        match catalog::add_selected(&result, &mut self.controller, &self.catalog.default_cover) {
            Ok(_) => self.alert(Notice::info(catalog::added_message(&result))),
            Err(e) => self.alert(Notice::error(e.user_message())),
        }
    }

    pub fn enter_add_file(&mut self) {
        self.path_input.clear();
        self.mode = Mode::AddFile;
    }

    /// Turn the typed path into a load request. An empty path just cancels.
    pub fn submit_add_file(&mut self) -> Option<TaskRequest> {
        self.mode = Mode::Normal;
        let raw = std::mem::take(&mut self.path_input);
        let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.is_empty() {
            return None;
        }
        Some(TaskRequest::AddFile {
            path: expand_home(trimmed),
        })
    }

    /// Fold a worker answer back into the model.
    pub fn apply_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Search { ticket, result } => self.apply_catalog(ticket, "Results", result),
            TaskResult::TopTracks { ticket, result } => {
                self.apply_catalog(ticket, "Top tracks", result)
            }
            TaskResult::FileLoaded { path, result } => match result {
                Ok(track) => {
                    let index = self.controller.append_track(track);
                    log::info!("added {} at {index}", path.display());
                    self.alert(Notice::info(FILE_ADDED));
                }
                Err(e) => {
                    log::error!("{e}");
                    self.alert(Notice::error(e.to_string()));
                }
            },
        }
    }

    fn apply_catalog(
        &mut self,
        ticket: u64,
        heading: &str,
        result: Result<Vec<catalog::CatalogTrack>, catalog::CatalogError>,
    ) {
        let latest = self.search.is_latest(ticket);
        match self.search.apply(ticket, heading, result) {
            Some(notice) => self.alert(notice),
            None if latest => self.mode = Mode::Results,
            None => {}
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
