//! Domain-level errors

use thiserror::Error;

/// Errors raised by domain entities and value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Hour outside the 0..=23 range
    #[error("Invalid hour: {0} (must be 0-23)")]
    InvalidHour(u8),

    /// Minute not on the 15-minute grid
    #[error("Invalid minute: {0} (must be one of 0, 15, 30, 45)")]
    InvalidMinute(u8),

    /// Route index outside the loaded catalog
    #[error("Route index {index} out of range (catalog has {len} routes)")]
    RouteIndexOutOfRange { index: usize, len: usize },

    /// A completed session was finalized with a step still missing
    #[error("Announcement draft is missing the '{0}' field")]
    IncompleteDraft(&'static str),
}
