use std::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rouille::{Response, Server};

use super::*;
use crate::config::CatalogSettings;
use crate::library::TrackSource;
use crate::notice::NoticeKind;
use crate::player::Playlist;

#[derive(Default)]
struct FakeCatalog {
    calls: Cell<usize>,
    queries: RefCell<Vec<String>>,
    answer: Vec<CatalogTrack>,
    fail_with: Option<CatalogError>,
}

impl CatalogBackend for FakeCatalog {
    fn search(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        self.queries.borrow_mut().push(query.to_string());
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(self.answer.clone()),
        }
    }

    fn top_tracks(&self) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(self.answer.clone()),
        }
    }

    fn featured_playlists(&self) -> Result<Vec<serde_json::Value>, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        Err(CatalogError::Request("offline".into()))
    }
}

fn result(title: &str, preview: Option<&str>) -> CatalogTrack {
    CatalogTrack {
        title: title.into(),
        artist: "Nils".into(),
        album: "Piano".into(),
        duration: Some(30.0),
        preview: preview.map(str::to_string),
        cover: None,
    }
}

#[test]
fn short_query_is_rejected_without_a_call() {
    let backend = FakeCatalog::default();
    let err = search(&backend, "a", 2).unwrap_err();
    assert_eq!(err, CatalogError::QueryTooShort { min: 2 });
    assert_eq!(err.user_message(), "Please enter a song name");

    assert!(search(&backend, "   x  ", 2).is_err());
    assert_eq!(backend.calls.get(), 0);
}

#[test]
fn query_is_trimmed_before_lookup() {
    let backend = FakeCatalog::default();
    search(&backend, "  piano  ", 2).unwrap();
    assert_eq!(backend.queries.borrow().as_slice(), ["piano"]);
}

#[test]
fn empty_answer_alerts_and_keeps_previous_results() {
    let mut panel = SearchPanel::new();
    let t1 = panel.begin();
    panel.apply(t1, "Results", Ok(vec![result("Old", Some("u"))]));

    let backend = FakeCatalog::default();
    let t2 = panel.begin();
    let notice = panel.apply(t2, "Results", search(&backend, "piano", 2)).unwrap();
    assert_eq!(notice.text, "No tracks found");
    assert_eq!(panel.results().len(), 1);
    assert_eq!(panel.results()[0].title, "Old");
}

#[test]
fn failed_search_alerts_with_reason() {
    let backend = FakeCatalog {
        fail_with: Some(CatalogError::Status {
            code: 500,
            reason: "Internal Server Error".into(),
        }),
        ..Default::default()
    };
    let mut panel = SearchPanel::new();
    let ticket = panel.begin();
    let notice = panel
        .apply(ticket, "Results", search(&backend, "piano", 2))
        .unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Search failed: 500 Internal Server Error");
    assert!(panel.results().is_empty());
}

#[test]
fn only_the_latest_ticket_is_rendered() {
    let mut panel = SearchPanel::new();
    let first = panel.begin();
    let second = panel.begin();

    assert!(panel.apply(second, "Results", Ok(vec![result("New", Some("u"))])).is_none());
    assert!(panel.apply(first, "Results", Ok(vec![result("Old", Some("u"))])).is_none());
    assert_eq!(panel.results()[0].title, "New");
}

#[test]
fn render_resets_selection() {
    let mut panel = SearchPanel::new();
    panel.render_results(vec![result("A", None), result("B", None)]);
    panel.select_next();
    assert_eq!(panel.selected(), 1);
    panel.select_next();
    assert_eq!(panel.selected(), 0);
    panel.select_prev();
    assert_eq!(panel.selected_result().map(|r| r.title.as_str()), Some("B"));

    panel.render_results(vec![result("C", None)]);
    assert_eq!(panel.selected(), 0);
}

#[test]
fn add_without_preview_changes_nothing() {
    let mut playlist = Playlist::default();
    let err = add_selected(&result("Silent", None), &mut playlist, "cover.svg").unwrap_err();
    assert_eq!(err.user_message(), "No preview available for this track");
    assert!(playlist.is_empty());

    let blank = result("Blank", Some("  "));
    assert!(add_selected(&blank, &mut playlist, "cover.svg").is_err());
    assert!(playlist.is_empty());
}

#[test]
fn add_appends_track_with_fallbacks() {
    let mut playlist = Playlist::default();
    let mut r = result("Says", Some("https://cdn.test/says.mp3"));
    r.duration = None;

    let index = add_selected(&r, &mut playlist, "assets/default-album.svg").unwrap();
    assert_eq!(index, 0);
    assert_eq!(added_message(&r), "Added: Says by Nils");

    let track = playlist.get(0).unwrap();
    assert_eq!(track.cover, "assets/default-album.svg");
    assert_eq!(track.duration, None);
    assert_eq!(
        track.source,
        TrackSource::Url("https://cdn.test/says.mp3".into())
    );
}

#[test]
fn result_duration_and_cover_are_kept() {
    let mut r = result("Says", Some("u"));
    r.cover = Some("https://img.test/c.jpg".into());
    let track = track_from_result(&r, "fallback").unwrap();
    assert_eq!(track.duration, Some(Duration::from_secs(30)));
    assert_eq!(track.cover, "https://img.test/c.jpg");

    r.duration = Some(f64::NAN);
    assert_eq!(track_from_result(&r, "fallback").unwrap().duration, None);
}

#[test]
fn listing_failures_degrade_to_empty() {
    let backend = FakeCatalog {
        fail_with: Some(CatalogError::Request("offline".into())),
        ..Default::default()
    };
    assert!(load_top_tracks(&backend).is_empty());
    assert!(load_featured_playlists(&backend).is_empty());
}

#[test]
fn top_tracks_passes_the_failure_on() {
    let backend = FakeCatalog {
        fail_with: Some(CatalogError::Request("offline".into())),
        ..Default::default()
    };
    assert_eq!(
        top_tracks(&backend).unwrap_err(),
        CatalogError::Request("offline".into())
    );
}

#[test]
fn result_deserializes_with_missing_fields() {
    let parsed: Vec<CatalogTrack> =
        serde_json::from_str(r#"[{"title":"T","artist":"A","preview":null}]"#).unwrap();
    assert_eq!(parsed[0].album, "");
    assert_eq!(parsed[0].preview, None);
    assert_eq!(parsed[0].duration, None);
}

fn with_server<F>(handler: F, test: impl FnOnce(CatalogSettings))
where
    F: Fn(&rouille::Request) -> Response + Send + Sync + 'static,
{
    let server = Server::new("127.0.0.1:0", handler).unwrap();
    let settings = CatalogSettings {
        api_base: format!("http://{}/api/", server.server_addr()),
        timeout_secs: 5,
        ..CatalogSettings::default()
    };
    let (handle, stop) = server.stoppable();
    test(settings);
    let _ = stop.send(());
    let _ = handle.join();
}

#[test]
fn http_catalog_encodes_query_in_path() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_server = seen.clone();

    with_server(
        move |request| {
            seen_by_server.lock().unwrap().push(request.raw_url().to_string());
            Response::text(r#"[{"title":"Says","artist":"Nils","album":"Spaces","preview":"p"}]"#)
                .with_unique_header("Content-Type", "application/json")
        },
        |settings| {
            let catalog = HttpCatalog::new(&settings).unwrap();
            let tracks = catalog.search("nils frahm/says").unwrap();
            assert_eq!(tracks.len(), 1);
            assert_eq!(tracks[0].album, "Spaces");
        },
    );

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        ["/api/search/nils%20frahm%2Fsays"]
    );
}

#[test]
fn http_catalog_reports_status_and_bad_json() {
    with_server(
        |request| match request.url().as_str() {
            "/api/top-tracks" => Response::text("not json"),
            _ => Response::text("boom").with_status_code(500),
        },
        |settings| {
            let catalog = HttpCatalog::new(&settings).unwrap();
            assert_eq!(
                catalog.search("piano").unwrap_err(),
                CatalogError::Status {
                    code: 500,
                    reason: "Internal Server Error".into()
                }
            );
            assert!(matches!(
                catalog.top_tracks().unwrap_err(),
                CatalogError::Decode(_)
            ));
        },
    );
}
