//! Time picker value object
//!
//! A bounded hour/minute pair driven by inline increment and decrement
//! buttons. Hours wrap modulo 24, minutes step in quarters of an hour and
//! wrap modulo 60, so the minute is always one of 0, 15, 30 or 45.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

const MINUTE_STEP: u8 = 15;

/// Hour/minute state of the time-selection widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePicker {
    hour: u8,
    minute: u8,
}

impl TimePicker {
    /// Create a picker at the given time
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is outside 0..=23 or the minute is not
    /// on the 15-minute grid.
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 {
            return Err(DomainError::InvalidHour(hour));
        }
        if minute % MINUTE_STEP != 0 || minute > 45 {
            return Err(DomainError::InvalidMinute(minute));
        }
        Ok(Self { hour, minute })
    }

    /// Current hour (0..=23)
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Current minute (0, 15, 30 or 45)
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Increment the hour, wrapping 23 -> 0
    pub fn up_hour(&mut self) {
        self.hour = (self.hour + 1) % 24;
    }

    /// Decrement the hour, wrapping 0 -> 23
    pub fn down_hour(&mut self) {
        self.hour = (self.hour + 23) % 24;
    }

    /// Increment the minute by 15, wrapping 45 -> 0
    pub fn up_minute(&mut self) {
        self.minute = (self.minute + MINUTE_STEP) % 60;
    }

    /// Decrement the minute by 15, wrapping 0 -> 45
    pub fn down_minute(&mut self) {
        self.minute = (self.minute + 60 - MINUTE_STEP) % 60;
    }
}

impl fmt::Display for TimePicker {
    /// Zero-padded `HH:MM`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
