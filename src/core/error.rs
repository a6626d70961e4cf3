//! Error types shared by the conversion and chart workflows

use thiserror::Error;

/// Failures raised while reading from or writing to a [`crate::core::page::Page`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("element {id} is not a {expected}")]
    WrongKind { id: String, expected: &'static str },
}

#[derive(Debug, Error)]
pub enum FxError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL: {0}")]
    Url(String),

    #[error("no rate for {currency}{}", .date.as_ref().map(|d| format!(" on {d}")).unwrap_or_default())]
    MissingRate {
        currency: String,
        date: Option<String>,
    },

    #[error("no historical rates between {start} and {end}")]
    EmptySeries { start: String, end: String },

    #[error("failed to render chart: {0}")]
    Render(String),

    #[error(transparent)]
    Page(#[from] PageError),
}

impl FxError {
    /// True when the failure happened before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, FxError::InvalidAmount(_))
    }
}
