//! Session entity - one user's in-progress conversational form
//!
//! A session walks the fixed state order
//! `Date -> Time -> TrackSelect -> StartPointSelect -> Pace -> Completed`.
//! Every state-advancing input is logged as a [`NavigationFrame`]; the
//! go-back protocol pops the stack and replays the frame below through the
//! same transition logic. Pure view refreshes (route-list pages, picker
//! ticks) are never logged.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Pace, SelectionToken, TimePicker};

/// The form states, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Collecting the ride date
    Date,
    /// Collecting the start time via the picker widget
    Time,
    /// Selecting a catalogued route
    TrackSelect,
    /// Selecting a starting location
    StartPointSelect,
    /// Selecting a pace preset
    Pace,
    /// Announcement produced; the session is about to be cleared
    Completed,
}

impl SessionState {
    /// The state a valid input advances to
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Date => Self::Time,
            Self::Time => Self::TrackSelect,
            Self::TrackSelect => Self::StartPointSelect,
            Self::StartPointSelect => Self::Pace,
            Self::Pace | Self::Completed => Self::Completed,
        }
    }
}

/// One inbound input, as the transition logic sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// Free text (dates, pace labels, anything typed)
    Text(String),
    /// A parsed selection token
    Token(SelectionToken),
}

/// A logged (state, input) pair eligible for undo-by-replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationFrame {
    /// State the input was received in
    pub state: SessionState,
    /// The input that advanced it
    pub input: SessionInput,
}

/// The accumulating form fields, one optional slot per step
///
/// Populated monotonically as the machine advances; a slot is only ever
/// rewritten when its step is replayed through go-back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideDraft {
    /// Ride date as free text (e.g. "March 10")
    pub date: Option<String>,
    /// Start time, zero-padded `HH:MM`
    pub time: Option<String>,
    /// Stable catalog index of the chosen route
    pub route_index: Option<usize>,
    /// Formatted start point label
    pub start_point: Option<String>,
    /// Chosen pace preset
    pub pace: Option<Pace>,
}

/// One user's transient conversation state
#[derive(Debug, Clone)]
pub struct Session {
    /// Current form state
    pub state: SessionState,
    /// Picker state; created on first entry to `Time`, then preserved so
    /// re-entries via go-back show the previously chosen values
    pub picker: Option<TimePicker>,
    /// Collected fields
    pub draft: RideDraft,
    /// Markdown mention of the submitting user
    pub submitter: String,
    stack: Vec<NavigationFrame>,
}

impl Session {
    /// Fresh session at the date prompt
    #[must_use]
    pub fn new(submitter: impl Into<String>) -> Self {
        Self {
            state: SessionState::Date,
            picker: None,
            draft: RideDraft::default(),
            submitter: submitter.into(),
            stack: Vec::new(),
        }
    }

    /// Log a state-advancing input
    pub fn push_frame(&mut self, state: SessionState, input: SessionInput) {
        self.stack.push(NavigationFrame { state, input });
    }

    /// Pop the most recent frame
    pub fn pop_frame(&mut self) -> Option<NavigationFrame> {
        self.stack.pop()
    }

    /// Peek the most recent frame without removing it
    #[must_use]
    pub fn last_frame(&self) -> Option<&NavigationFrame> {
        self.stack.last()
    }

    /// Number of logged frames
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Clear everything and re-enter the date prompt
    pub fn restart(&mut self) {
        self.state = SessionState::Date;
        self.picker = None;
        self.draft = RideDraft::default();
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_order_is_fixed() {
        assert_eq!(SessionState::Date.next(), SessionState::Time);
        assert_eq!(SessionState::Time.next(), SessionState::TrackSelect);
        assert_eq!(SessionState::TrackSelect.next(), SessionState::StartPointSelect);
        assert_eq!(SessionState::StartPointSelect.next(), SessionState::Pace);
        assert_eq!(SessionState::Pace.next(), SessionState::Completed);
        assert_eq!(SessionState::Completed.next(), SessionState::Completed);
    }

    #[test]
    fn new_session_starts_at_date_with_empty_stack() {
        let session = Session::new("[user](tg://user?id=1)");
        assert_eq!(session.state, SessionState::Date);
        assert_eq!(session.depth(), 0);
        assert!(session.picker.is_none());
        assert_eq!(session.draft, RideDraft::default());
    }

    #[test]
    fn frames_pop_in_lifo_order() {
        let mut session = Session::new("u");
        session.push_frame(SessionState::Date, SessionInput::Text("March 10".to_string()));
        session
            .push_frame(SessionState::Time, SessionInput::Token(SelectionToken::SavePicker));

        let top = session.pop_frame().unwrap();
        assert_eq!(top.state, SessionState::Time);
        let below = session.pop_frame().unwrap();
        assert_eq!(below.state, SessionState::Date);
        assert!(session.pop_frame().is_none());
    }

    #[test]
    fn restart_clears_everything() {
        let mut session = Session::new("u");
        session.state = SessionState::Pace;
        session.picker = Some(TimePicker::new(7, 15).unwrap());
        session.draft.date = Some("March 10".to_string());
        session.push_frame(SessionState::Date, SessionInput::Text("March 10".to_string()));

        session.restart();

        assert_eq!(session.state, SessionState::Date);
        assert!(session.picker.is_none());
        assert!(session.draft.date.is_none());
        assert_eq!(session.depth(), 0);
    }
}
