//! The finished announcement record

use serde::{Deserialize, Serialize};

use super::RideDraft;
use crate::errors::DomainError;

/// Fully assembled announcement, derived once from a completed session
///
/// Immutable after creation. `route_index` points back into the catalog so
/// the sender can reuse the route's cached preview handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Ride date as entered or picked
    pub date: String,
    /// Start time, `HH:MM`
    pub time: String,
    /// Route caption (markdown link with stats)
    pub track: String,
    /// Formatted start point label
    pub start_point: String,
    /// Pace label
    pub pace: String,
    /// Markdown mention of the submitter
    pub submitter: String,
    /// Stable catalog index of the announced route
    pub route_index: usize,
}

impl Announcement {
    /// Assemble the announcement from a completed draft
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IncompleteDraft`] naming the first missing
    /// field; the state machine only calls this after the pace step, so a
    /// miss indicates a transition bug, not user error.
    pub fn from_draft(
        draft: &RideDraft,
        track_caption: &str,
        submitter: &str,
    ) -> Result<Self, DomainError> {
        let date = draft.date.clone().ok_or(DomainError::IncompleteDraft("date"))?;
        let time = draft.time.clone().ok_or(DomainError::IncompleteDraft("time"))?;
        let route_index = draft.route_index.ok_or(DomainError::IncompleteDraft("track"))?;
        let start_point =
            draft.start_point.clone().ok_or(DomainError::IncompleteDraft("start_point"))?;
        let pace = draft.pace.ok_or(DomainError::IncompleteDraft("pace"))?;

        Ok(Self {
            date,
            time,
            track: track_caption.to_string(),
            start_point,
            pace: pace.label().to_string(),
            submitter: submitter.to_string(),
            route_index,
        })
    }

    /// The outbound message text (photo caption)
    #[must_use]
    pub fn message_text(&self) -> String {
        format!(
            "Announcement ({})\n\n{}\n{} at {}\nPace: {}\n\nby {}",
            self.date, self.track, self.time, self.start_point, self.pace, self.submitter
        )
    }
}
