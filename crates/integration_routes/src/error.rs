//! Route scraping errors
//!
//! Every variant is fatal to the affected route only; the catalog loader
//! skips the entry and continues.

use thiserror::Error;

/// Errors raised while loading a single route
#[derive(Debug, Error)]
pub enum RouteScrapeError {
    /// The URL's host matches no registered provider
    #[error("No provider registered for host: {0}")]
    UnsupportedProvider(String),

    /// The route URL could not be parsed at all
    #[error("Invalid route URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure fetching the page or the image
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status fetching the page or the image
    #[error("Fetch of {url} failed with status {status}")]
    Fetch {
        /// What was being fetched
        url: String,
        /// The returned status code
        status: u16,
    },

    /// Page fetched but an expected metadata field is absent or malformed
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The preview image could not be decoded or re-encoded
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// The background annotation task was cancelled or panicked
    #[error("Annotation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
