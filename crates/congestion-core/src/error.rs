// crates/congestion-core/src/error.rs
use thiserror::Error;

/// Errors raised while loading a dataset or interpreting user selections.
///
/// Everything the map can recover from on its own (a missing metric, a
/// location without a marker, an exhausted poll) is *not* an error; those
/// paths log and carry on. What ends up here is what the host should show
/// to the user once, in the error banner.
#[derive(Debug, Error)]
pub enum CongestionError {
    /// Dataset file or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was not a JSON array of records.
    #[cfg(feature = "json")]
    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure while fetching a dataset URL.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with a success status.
    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus { status: u16, url: String },

    /// Structurally valid input that cannot be used (e.g. an unsupported source).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A filter value that is neither "All" nor "City, REGION".
    #[error("Invalid location '{0}': expected \"City, REGION\"")]
    InvalidLocation(String),
}

pub type Result<T> = std::result::Result<T, CongestionError>;
