//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads state; nothing here mutates the app.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Mode};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::display_from_fields;
use crate::notice::{Notice, NoticeKind};
use crate::player::{MediaElement, format_duration};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected song".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L and -/+ are filled dynamically from config.
    map.insert("0-9".to_string(), "jump to 0-90%".to_string());
    map.insert("r".to_string(), "repeat mode".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("tab".to_string(), "results".to_string());
    map.insert("T".to_string(), "top tracks".to_string());
    map.insert("a".to_string(), "add file".to_string());
    map.insert("K".to_string(), "metadata".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "0-9", "enter", "space/p", "-/+", "gg/G", "r", "s", "/", "tab",
        "T", "a", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}%", controls.seek_step_percent)),
            "-/+" => Some(format!("[-/+] volume -/+{}%", controls.volume_step)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Controls shown while a text prompt or the result list has focus.
fn mode_controls_text(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::Normal => None,
        Mode::SearchInput => Some("[enter] search | [tab] results | [esc] back"),
        Mode::Results => Some("[j/k] up/down | [enter] add to playlist | [/] new search | [esc] back"),
        Mode::AddFile => Some("[enter] add file | [esc] cancel"),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Window `[start, end)` of a list of `total` rows that keeps `selected`
/// centered when possible, plus the selection's offset inside it.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected.min(total.saturating_sub(1)));
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App<M>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, app, ui_settings, chunks[1]);
    draw_progress(frame, app, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);
    draw_playlist(frame, app, ui_settings, body[0]);
    draw_search(frame, app, body[1]);

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        draw_metadata(frame, app, body[0]);
    }
    if app.mode == Mode::AddFile {
        draw_path_prompt(frame, app, chunks[3]);
    }

    let footer_text = mode_controls_text(app.mode)
        .map(str::to_string)
        .unwrap_or_else(|| controls_text(controls_settings));
    let footer = Paragraph::new(footer_text)
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    // Alerts go on top of everything else.
    if let Some(notice) = app.current_alert() {
        let area = frame.area();
        draw_alert(frame, notice, area);
    }
}

fn draw_now_playing<M: MediaElement>(frame: &mut Frame, app: &App<M>, ui: &UiSettings, area: Rect) {
    let controller = &app.controller;
    let state = controller.state();

    let mut lines: Vec<Line> = Vec::new();
    match controller.current_track() {
        Some(track) => {
            let song = display_from_fields(
                track,
                &ui.now_playing_track_fields,
                &ui.now_playing_track_separator,
            );
            lines.push(Line::from(song).bold());
            lines.push(Line::from(format!("{} • {}", track.artist, track.album)));
            lines.push(Line::from(format!("Cover: {}", track.cover)).dim());
        }
        None => lines.push(Line::from("Playlist is empty").italic()),
    }

    let mut parts: Vec<String> = vec![
        if state.is_playing { "Playing" } else { "Paused" }.to_string(),
        state.repeat_mode.label().to_string(),
        if state.shuffle { "Shuffle On" } else { "Shuffle Off" }.to_string(),
        format!("Volume: {:.0}%", controller.volume_percent()),
    ];
    // cursor mode
    if app.follow_playback {
        parts.push("Cursor: Follow".to_string());
    } else {
        parts.push("Cursor: Free-roam".to_string());
    }
    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {}", dir));
    }
    lines.push(Line::from(parts.join(" • ")));

    let paragraph = Paragraph::new(lines)
        .block(padded_block(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_progress<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let progress = app.controller.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((progress.percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{} / {}", progress.elapsed, progress.total));
    frame.render_widget(gauge, area);
}

fn draw_playlist<M: MediaElement>(frame: &mut Frame, app: &App<M>, ui: &UiSettings, area: Rect) {
    let playlist = app.controller.playlist();
    let current = app.controller.state().current_index;

    // Center the selected item when possible by creating a visible window.
    // Important: only build ListItems for the visible window (avoid allocating the entire list).
    let total = playlist.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_pos_in_visible) = visible_window(total, list_height, app.selected);

    let visible_items: Vec<ListItem> = playlist
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(i, track)| {
            let text = display_from_fields(track, &ui.playlist_fields, &ui.playlist_separator);
            let duration = format_duration(track.duration);
            let line = format!("{text}  [{duration}]");
            if i == current {
                ListItem::new(format!("♪ {line}")).style(Style::default().fg(Color::Green).bold())
            } else {
                ListItem::new(format!("  {line}"))
            }
        })
        .collect();

    let focused = app.mode == Mode::Normal;
    let list = List::new(visible_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" playlist ({total}) "))
                .border_style(focus_style(focused)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn draw_search<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let typing = app.mode == Mode::SearchInput;
    let mut query = app.search.query.clone();
    if typing {
        query.push('_');
    }
    let input = Paragraph::new(query).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" search ")
            .border_style(focus_style(typing)),
    );
    frame.render_widget(input, chunks[0]);

    let items: Vec<ListItem> = app
        .search
        .results()
        .iter()
        .map(|r| {
            let cover = r.cover.as_deref().unwrap_or("-");
            let mut first = format!("{} - {}", r.title, r.artist);
            if !r.album.trim().is_empty() {
                first.push_str(&format!(" ({})", r.album));
            }
            if r.preview.is_none() {
                first.push_str(" [no preview]");
            }
            ListItem::new(vec![Line::from(first), Line::from(format!("  {cover}")).dim()])
        })
        .collect();

    let heading = if app.search.heading.is_empty() {
        "results"
    } else {
        app.search.heading.as_str()
    };
    let browsing = app.mode == Mode::Results;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {heading} "))
                .border_style(focus_style(browsing)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("+ ");
    let mut state = ListState::default();
    if browsing && !app.search.results().is_empty() {
        state.select(Some(app.search.selected()));
    }
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_metadata<M: MediaElement>(frame: &mut Frame, app: &App<M>, list_area: Rect) {
    // Keep the popup inside the list area so it doesn't cover header/status/footer.
    let popup_area = centered_rect_sized(72, 9, list_area);
    frame.render_widget(Clear, popup_area);

    let meta = match app.controller.playlist().get(app.selected) {
        Some(track) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nSource: {}\nCover: {}",
            track.title,
            track.artist,
            track.album,
            format_duration(track.duration),
            track.source.describe(),
            track.cover,
        ),
        None => "No track selected".to_string(),
    };
    let meta_paragraph = Paragraph::new(meta)
        .block(padded_block(" metadata (K closes) "))
        .wrap(Wrap { trim: true });
    frame.render_widget(meta_paragraph, popup_area);
}

fn draw_path_prompt<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let popup_area = centered_rect_sized(70, 5, area);
    frame.render_widget(Clear, popup_area);
    let prompt = Paragraph::new(format!("{}_", app.path_input))
        .block(padded_block(" add audio file (path) "))
        .wrap(Wrap { trim: false });
    frame.render_widget(prompt, popup_area);
}

fn draw_alert(frame: &mut Frame, notice: &Notice, area: Rect) {
    let popup_area = centered_rect_sized(60, 7, area);
    frame.render_widget(Clear, popup_area);

    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    let body = vec![
        Line::from(notice.text.as_str()),
        Line::from(""),
        Line::from("press any key").dim().alignment(Alignment::Right),
    ];
    let paragraph = Paragraph::new(body)
        .block(
            padded_block(notice.title())
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}
