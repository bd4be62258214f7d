//! Background worker for everything that may block: catalog lookups and
//! reading local files.
//!
//! Requests are handled one at a time in submission order. Results come back
//! over a channel the event loop drains every frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::app::{TaskRequest, TaskResult};
use crate::catalog::{self, CatalogBackend};
use crate::config::LibrarySettings;
use crate::library::load_local_file;

pub struct TaskWorker {
    tx: Sender<TaskRequest>,
    rx: Receiver<TaskResult>,
}

impl TaskWorker {
    pub fn spawn<B>(backend: B, library: LibrarySettings) -> Self
    where
        B: CatalogBackend + Send + 'static,
    {
        let (tx, requests) = mpsc::channel::<TaskRequest>();
        let (results, rx) = mpsc::channel::<TaskResult>();

        thread::spawn(move || {
            for request in requests {
                let result = run_task(&backend, &library, request);
                if results.send(result).is_err() {
                    break;
                }
            }
            log::debug!("task worker finished");
        });

        Self { tx, rx }
    }

    pub fn submit(&self, request: TaskRequest) {
        log::debug!("submitting {request:?}");
        if self.tx.send(request).is_err() {
            log::error!("task worker is gone, request dropped");
        }
    }

    pub fn try_recv(&self) -> Option<TaskResult> {
        self.rx.try_recv().ok()
    }
}

/// Run one request to completion.
pub fn run_task<B: CatalogBackend + ?Sized>(
    backend: &B,
    library: &LibrarySettings,
    request: TaskRequest,
) -> TaskResult {
    match request {
        TaskRequest::Search { ticket, query } => TaskResult::Search {
            ticket,
            // Already validated by the app; a minimum of one only rejects blanks.
            result: catalog::search(backend, &query, 1),
        },
        TaskRequest::TopTracks { ticket } => TaskResult::TopTracks {
            ticket,
            result: catalog::top_tracks(backend),
        },
        TaskRequest::AddFile { path } => {
            let result = load_local_file(&path, library);
            TaskResult::FileLoaded { path, result }
        }
    }
}
