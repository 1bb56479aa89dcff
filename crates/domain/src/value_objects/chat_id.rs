//! Chat identifier value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport-assigned identifier of one conversation
///
/// One `ChatId` maps to at most one in-progress [`crate::Session`]. The
/// value is opaque to the core; it is only used as a session key and to
/// build the submitter mention link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Wrap a raw transport chat id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw transport value
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
