use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("query must be at least {min} characters")]
    QueryTooShort { min: usize },
    #[error("{code} {reason}")]
    Status { code: u16, reason: String },
    #[error("{0}")]
    Request(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("no preview available")]
    NoPreview,
}

impl CatalogError {
    /// The alert text shown for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::QueryTooShort { .. } => "Please enter a song name".to_string(),
            CatalogError::NoPreview => "No preview available for this track".to_string(),
            other => format!("Search failed: {other}"),
        }
    }
}
