//! Typed errors for the catalog loader and the chat backend.

/// Failure talking to the hosted chat model.
///
/// These never reach the UI as values: the dispatcher flattens every variant
/// into a fixed transcript line.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Transport(reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ChatError {
    /// Drops the request URL so nothing from it lands in the log.
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate episode id `{0}`")]
    DuplicateEpisodeId(String),
    #[error("catalog has no episodes")]
    Empty,
}
