//! Ride pace presets

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed pace vocabulary offered at the last form step
///
/// The wire value of each preset is its label; pace input therefore
/// arrives as free text rather than as a selection token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pace {
    /// Easy/recovery ride
    Easy,
    /// Steady endurance pace
    Z2,
    /// Fast group
    Fast,
}

impl Pace {
    /// All presets in keyboard order
    pub const ALL: [Self; 3] = [Self::Easy, Self::Z2, Self::Fast];

    /// Wire/announcement label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy/recovery",
            Self::Z2 => "Z2",
            Self::Fast => "FAST",
        }
    }

    /// Short button caption
    #[must_use]
    pub const fn button_label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Z2 => "Z2",
            Self::Fast => "Fast",
        }
    }

    /// Parse a wire label back into a preset
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
