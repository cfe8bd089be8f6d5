// Fetch error taxonomy

use reqwest::StatusCode;

/// Failure of a single request against the report API.
///
/// Both variants are absorbed by the view state: they are logged and the
/// previous data stays on screen.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The API answered with a non-success status.
    #[error("HTTP error, status: {status}")]
    Transport { status: StatusCode },
    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The body was not the JSON shape we expect.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Request(_))
    }
}
