//! Time and timestamp helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::BlockDuration;
use crate::error::ValidationError;

/// UTC timestamp used for log entries and block start instants.
pub type Timestamp = DateTime<Utc>;

const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// A wall-clock time of day with second precision, used for the show
/// schedule (start time, computed end time).
///
/// Parses from `HH:MM` (24 hour) and displays as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    secs: u32,
}

impl TimeOfDay {
    /// Build from hours and minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeOfDay`] when either component is
    /// out of range.
    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self, ValidationError> {
        if hours >= 24 || minutes >= 60 {
            return Err(ValidationError::InvalidTimeOfDay(format!(
                "{hours}:{minutes}"
            )));
        }
        Ok(Self {
            secs: hours * 3600 + minutes * 60,
        })
    }

    pub(crate) const fn from_secs_unchecked(secs: u32) -> Self {
        Self { secs }
    }

    #[must_use]
    pub fn hours(self) -> u32 {
        self.secs / 3600
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        (self.secs % 3600) / 60
    }

    #[must_use]
    pub fn seconds(self) -> u32 {
        self.secs % 60
    }

    /// Add a duration, wrapping past midnight.
    #[must_use]
    pub fn wrapping_add(self, duration: BlockDuration) -> Self {
        let total = (u64::from(self.secs) + duration.as_secs() % SECONDS_PER_DAY) % SECONDS_PER_DAY;
        // always < 86_400
        Self {
            secs: u32::try_from(total).unwrap_or_default(),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTimeOfDay(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hours = h.parse::<u32>().map_err(|_| invalid())?;
        let minutes = m.parse::<u32>().map_err(|_| invalid())?;
        Self::from_hm(hours, minutes).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        format!("{:02}:{:02}", value.hours(), value.minutes())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}
