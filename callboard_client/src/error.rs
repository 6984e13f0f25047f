use thiserror::Error;

/// Text used when a failed fetch carries no description of its own.
pub const FETCH_FALLBACK_MESSAGE: &str = "failed to load calls";

/// Raised by an [`AuthenticatedTransport`](crate::api::AuthenticatedTransport)
/// when no usable response came back.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Why a `/calls` page could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with status {status}")]
    Request { status: u16 },
    #[error("{}", .0.as_deref().unwrap_or(FETCH_FALLBACK_MESSAGE))]
    Transport(Option<String>),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            FetchError::Transport(None)
        } else {
            FetchError::Transport(Some(message))
        }
    }
}

/// Why saving the call layout failed.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to save call layout: status {status}")]
    SaveFailed { status: u16 },
    #[error("failed to save call layout: {0}")]
    Transport(String),
}

impl From<TransportError> for LayoutError {
    fn from(err: TransportError) -> Self {
        LayoutError::Transport(err.to_string())
    }
}
