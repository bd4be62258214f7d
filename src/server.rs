//! Static file server for the web front end (`encore serve`).
//!
//! Existing files under the root are served as they are; every other GET
//! falls back to `index.html` so client-side routes keep working.

use std::fs::File;
use std::path::{Path, PathBuf};

use rouille::{Request, Response, Server};
use thiserror::Error;

use crate::config::ServerSettings;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("site root {0} is not a directory")]
    MissingRoot(PathBuf),
    #[error("could not listen on {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

/// Route one request against the files under `root`.
pub fn handle_request(request: &Request, root: &Path) -> Response {
    let asset = rouille::match_assets(request, root);
    if asset.is_success() {
        return asset;
    }

    match request.method() {
        "GET" | "HEAD" => serve_index(root),
        _ => Response::empty_404(),
    }
}

fn serve_index(root: &Path) -> Response {
    let index = root.join("index.html");
    match File::open(&index) {
        Ok(file) => Response::from_file("text/html; charset=utf-8", file),
        Err(e) => {
            log::error!("cannot serve {}: {e}", index.display());
            Response::text("Something went wrong!").with_status_code(500)
        }
    }
}

/// Pick the listening port: command line, then `PORT`, then config.
pub fn resolve_port(cli: Option<u16>, env_port: Option<&str>, configured: u16) -> u16 {
    cli.or_else(|| {
        env_port.and_then(|p| {
            p.trim()
                .parse()
                .inspect_err(|_| log::warn!("ignoring invalid PORT value {p:?}"))
                .ok()
        })
    })
    .unwrap_or(configured)
}

/// Serve `root` until the process is killed.
pub fn serve(settings: &ServerSettings, root: PathBuf, port: u16) -> Result<(), ServerError> {
    if !root.is_dir() {
        return Err(ServerError::MissingRoot(root));
    }

    let addr = format!("{}:{port}", settings.bind);
    let site = root.clone();
    let server = Server::new(&addr, move |request| {
        let response = handle_request(request, &site);
        log::debug!(
            "{} {} -> {}",
            request.method(),
            request.raw_url(),
            response.status_code
        );
        response
    })
    .map_err(|e| ServerError::Bind {
        addr: addr.clone(),
        reason: e.to_string(),
    })?;

    log::info!("music player server running on port {port}, root {}", root.display());
    println!("Open http://localhost:{port} in your browser");
    server.run();
    Ok(())
}
