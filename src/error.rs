//! Error types for the venue tools library

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the venue tools library
#[derive(Error, Debug)]
pub enum Error {
    /// Date string could not be turned into a timestamp
    #[error("Invalid date string: {0}")]
    InvalidDateString(String),

    /// Display format name not recognised
    #[error("Unknown date format: {0} (expected \"full\" or \"medium\")")]
    UnknownDateFormat(String),

    /// Event target has no `id` data attribute
    #[error("Event target has no venue identifier")]
    MissingIdentifier,

    /// Delete request was rejected or returned a non-success status
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Origin could not be parsed into a page location
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
}
