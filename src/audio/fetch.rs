//! Reading a track's source into memory.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::library::TrackSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode audio: {0}")]
    Decode(String),
}

/// Fetch the raw bytes behind `source`.
///
/// URLs go through `client`, files are read from disk and in-memory blobs
/// are shared as they are.
pub fn read_source(source: &TrackSource, client: &Client) -> Result<Arc<[u8]>, SourceError> {
    match source {
        TrackSource::Bytes(bytes) => Ok(Arc::clone(bytes)),
        TrackSource::File(path) => std::fs::read(path)
            .map(Arc::from)
            .map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            }),
        TrackSource::Url(url) => {
            let http = |source| SourceError::Http {
                url: url.clone(),
                source,
            };
            let response = client.get(url).send().map_err(http)?;
            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().map_err(http)?;
            log::debug!("fetched {} bytes from {url}", bytes.len());
            Ok(Arc::from(&bytes[..]))
        }
    }
}
