use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::CatalogSettings;

use super::error::CatalogError;
use super::model::CatalogTrack;

/// The remote catalog as the adapter sees it.
pub trait CatalogBackend {
    fn search(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError>;
    fn top_tracks(&self) -> Result<Vec<CatalogTrack>, CatalogError>;
    fn featured_playlists(&self) -> Result<Vec<serde_json::Value>, CatalogError>;
}

/// Blocking HTTP client for the catalog API.
pub struct HttpCatalog {
    client: Client,
    api_base: String,
}

impl HttpCatalog {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.api_base);
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {url} answered {status}");
            return Err(CatalogError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<T>()
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

impl CatalogBackend for HttpCatalog {
    fn search(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.get_json(&format!("search/{}", urlencoding::encode(query)))
    }

    fn top_tracks(&self) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.get_json("top-tracks")
    }

    fn featured_playlists(&self) -> Result<Vec<serde_json::Value>, CatalogError> {
        self.get_json("playlists")
    }
}
