//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Outbound messenger operation failed
    #[error("Messenger error: {0}")]
    Messenger(String),

    /// Route scraping failed
    #[error("Route scraping error: {0}")]
    Scrape(String),

    /// Internal invariant violated
    #[error("Internal error: {0}")]
    Internal(String),
}
