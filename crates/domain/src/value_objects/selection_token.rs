//! Selection token vocabulary - the stable wire contract for inline choices
//!
//! Every inline button the bot renders carries one of these tokens as its
//! callback payload. The string forms are a wire contract shared with any
//! transport adapter and must stay stable across releases.

use std::fmt;

/// Control token for the go-back action
pub const GO_BACK_DATA: &str = "go-back-data";
/// Control token for the restart action
pub const RESTART_DATA: &str = "restart-data";
/// Control token for display-only picker cells
pub const NO_ACTION_DATA: &str = "no-action-data";
/// Picker control: hour + 1 (wraps at 24)
pub const PICKER_UP_HOUR_DATA: &str = "picker-up-hour-data";
/// Picker control: hour - 1 (wraps at 0)
pub const PICKER_DOWN_HOUR_DATA: &str = "picker-down-hour-data";
/// Picker control: minute + 15 (wraps at 60)
pub const PICKER_UP_MINUTE_DATA: &str = "picker-up-minute-data";
/// Picker control: minute - 15 (wraps at 0)
pub const PICKER_DOWN_MINUTE_DATA: &str = "picker-down-minute-data";
/// Picker control: save the displayed time and advance
pub const PICKER_SAVE_DATA: &str = "picker-save-data";
/// Post the last completed announcement to the broadcast channel
pub const POST_TO_CHANNEL_DATA: &str = "post-to-channel-data";

const ROUTE_PREFIX: &str = "route-";
const START_POINT_PREFIX: &str = "start-point-";

/// A parsed selection token
///
/// Tokens either name a fixed control action or carry a zero-based index:
/// a catalog route, a start-point handle, or a route-list page. Page
/// indices travel as bare decimal strings, matching the page buttons the
/// route list renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionToken {
    /// Undo the last state-advancing step
    GoBack,
    /// Clear the session and start over from the date prompt
    Restart,
    /// Acknowledged but otherwise ignored (picker display cells)
    NoAction,
    /// Increment the picker hour
    UpHour,
    /// Decrement the picker hour
    DownHour,
    /// Increment the picker minute
    UpMinute,
    /// Decrement the picker minute
    DownMinute,
    /// Save the picker time and advance to route selection
    SavePicker,
    /// Select a catalog route by its stable zero-based index
    Route(usize),
    /// Select a start point by its stable zero-based handle
    StartPoint(usize),
    /// Show another page of the route list (pure view refresh)
    Page(usize),
    /// Re-send the last completed announcement to the channel
    PostToChannel,
}

impl SelectionToken {
    /// Parse a wire string into a token
    ///
    /// Returns `None` for anything outside the vocabulary; callers treat
    /// such input as free text (date presets and pace labels travel as
    /// their display strings, not as tokens).
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            GO_BACK_DATA => return Some(Self::GoBack),
            RESTART_DATA => return Some(Self::Restart),
            NO_ACTION_DATA => return Some(Self::NoAction),
            PICKER_UP_HOUR_DATA => return Some(Self::UpHour),
            PICKER_DOWN_HOUR_DATA => return Some(Self::DownHour),
            PICKER_UP_MINUTE_DATA => return Some(Self::UpMinute),
            PICKER_DOWN_MINUTE_DATA => return Some(Self::DownMinute),
            PICKER_SAVE_DATA => return Some(Self::SavePicker),
            POST_TO_CHANNEL_DATA => return Some(Self::PostToChannel),
            _ => {},
        }

        if let Some(rest) = data.strip_prefix(ROUTE_PREFIX) {
            return rest.parse().ok().map(Self::Route);
        }
        if let Some(rest) = data.strip_prefix(START_POINT_PREFIX) {
            return rest.parse().ok().map(Self::StartPoint);
        }
        data.parse().ok().map(Self::Page)
    }
}

impl fmt::Display for SelectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoBack => f.write_str(GO_BACK_DATA),
            Self::Restart => f.write_str(RESTART_DATA),
            Self::NoAction => f.write_str(NO_ACTION_DATA),
            Self::UpHour => f.write_str(PICKER_UP_HOUR_DATA),
            Self::DownHour => f.write_str(PICKER_DOWN_HOUR_DATA),
            Self::UpMinute => f.write_str(PICKER_UP_MINUTE_DATA),
            Self::DownMinute => f.write_str(PICKER_DOWN_MINUTE_DATA),
            Self::SavePicker => f.write_str(PICKER_SAVE_DATA),
            Self::PostToChannel => f.write_str(POST_TO_CHANNEL_DATA),
            Self::Route(i) => write!(f, "{ROUTE_PREFIX}{i}"),
            Self::StartPoint(i) => write!(f, "{START_POINT_PREFIX}{i}"),
            Self::Page(i) => write!(f, "{i}"),
        }
    }
}
