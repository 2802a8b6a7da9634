//! Run state: where timed playback currently stands.
//!
//! Transitions:
//!
//! ```text
//! idle ──start──▶ running ⇄ paused
//!                    │ advance past last block
//!                    ▼
//!                completed ──start──▶ running (block 0)
//! any ──stop──▶ idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;
use crate::time::Timestamp;

/// Playback status of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl RunStatus {
    /// Running or paused.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        })
    }
}

/// Result of moving past the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A following block exists and is now current.
    Next(usize),
    /// The run is exhausted and is now [`RunStatus::Completed`].
    Completed,
}

/// Status and position of a run.
///
/// Invariants upheld by every transition:
/// - `Idle` and `Completed` have no current block.
/// - `Running` and `Paused` always have a current block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    status: RunStatus,
    current_block_index: Option<usize>,
    /// Wall-clock instant the current block went on air.
    block_started_at: Option<Timestamp>,
}

impl RunState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    #[must_use]
    pub fn current_block_index(&self) -> Option<usize> {
        self.current_block_index
    }

    #[must_use]
    pub fn block_started_at(&self) -> Option<Timestamp> {
        self.block_started_at
    }

    /// Begin (or restart after completion) at block 0.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::EmptyRun`] when `len` is zero; the state is unchanged.
    /// - [`PlaybackError::AlreadyActive`] when running or paused.
    pub fn start(&mut self, len: usize) -> Result<(), PlaybackError> {
        if self.status.is_active() {
            return Err(PlaybackError::AlreadyActive);
        }
        if len == 0 {
            return Err(PlaybackError::EmptyRun);
        }
        self.status = RunStatus::Running;
        self.current_block_index = Some(0);
        self.block_started_at = None;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PlaybackError::NotRunning`] unless the run is running.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.status != RunStatus::Running {
            return Err(PlaybackError::NotRunning);
        }
        self.status = RunStatus::Paused;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PlaybackError::NotPaused`] unless the run is paused.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.status != RunStatus::Paused {
            return Err(PlaybackError::NotPaused);
        }
        self.status = RunStatus::Running;
        Ok(())
    }

    /// Reset to idle from any state.
    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Record the wall-clock start of the current block.
    pub fn mark_block_started(&mut self, at: Timestamp) {
        if self.current_block_index.is_some() {
            self.block_started_at = Some(at);
        }
    }

    /// Move to the block after the current one in a run of `len` blocks.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotRunning`] unless the run is running; the
    /// state is unchanged in that case.
    pub fn advance(&mut self, len: usize) -> Result<Advance, PlaybackError> {
        if self.status != RunStatus::Running {
            return Err(PlaybackError::NotRunning);
        }
        let next = self.current_block_index.map_or(0, |i| i + 1);
        self.block_started_at = None;
        if next < len {
            self.current_block_index = Some(next);
            Ok(Advance::Next(next))
        } else {
            self.status = RunStatus::Completed;
            self.current_block_index = None;
            Ok(Advance::Completed)
        }
    }
}
