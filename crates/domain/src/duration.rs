//! Block durations: `SS`, `MM:SS` and `HH:MM:SS` strings.
//!
//! Operators type durations by hand, so a [`Block`](crate::block::Block)
//! keeps the raw text and parses it only when it is needed. Parsing accepts
//! one to three `:`-separated components, each a non-negative integer;
//! components are not range-checked (`"1:75"` is 135 seconds). Formatting is
//! canonical: `MM:SS` below one hour, `HH:MM:SS` from one hour up.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reasons a duration string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("duration {0:?} has more than three components")]
    TooManyComponents(String),
    #[error("duration component {0:?} is not a non-negative integer")]
    InvalidComponent(String),
}

/// A whole number of seconds a block stays on air.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockDuration(u64);

impl BlockDuration {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub fn as_secs(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0.saturating_mul(1000)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert to a [`std::time::Duration`] for timers.
    #[must_use]
    pub fn to_std(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl FromStr for BlockDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DurationError::Empty);
        }

        let parts = s
            .split(':')
            .map(|part| {
                let part = part.trim();
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DurationError::InvalidComponent(part.to_string()));
                }
                part.parse::<u64>()
                    .map_err(|_| DurationError::InvalidComponent(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let secs = match parts.as_slice() {
            [ss] => *ss,
            [mm, ss] => mm.saturating_mul(60).saturating_add(*ss),
            [hh, mm, ss] => hh
                .saturating_mul(3600)
                .saturating_add(mm.saturating_mul(60))
                .saturating_add(*ss),
            _ => return Err(DurationError::TooManyComponents(s.to_string())),
        };
        Ok(Self(secs))
    }
}

impl fmt::Display for BlockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        if hours > 0 {
            write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{minutes:02}:{seconds:02}")
        }
    }
}

impl Add for BlockDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for BlockDuration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
