use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::InvalidTimeError;

/// an hour and minute on a 24 hour clock, with no date or seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// # Errors
    /// if hour isn't in `0..24` or minute isn't in `0..60`
    pub const fn new(hour: u32, minute: u32) -> Result<Self, InvalidTimeError> {
        if hour < 24 && minute < 60 {
            Ok(Self { hour, minute })
        } else {
            Err(InvalidTimeError { hour, minute })
        }
    }

    #[must_use]
    pub const fn hour(self) -> u32 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u32 {
        self.minute
    }

    /// true for the whole 60 seconds of this minute, on any day
    #[must_use]
    pub fn matches(self, now: NaiveDateTime) -> bool {
        now.hour() == self.hour && now.minute() == self.minute
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// the calendar minute an alarm last went off in
/// keeping the date means a clock jumping backwards can't ring the same minute twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
}

impl From<NaiveDateTime> for DedupeKey {
    fn from(now: NaiveDateTime) -> Self {
        Self {
            date: now.date(),
            hour: now.hour(),
            minute: now.minute(),
        }
    }
}

impl fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.hour,
            self.minute
        )
    }
}
