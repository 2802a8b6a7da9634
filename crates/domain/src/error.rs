//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ShowError`]
//! via `#[from]` / `From` impls, so callers only ever match on one enum.

use crate::duration::DurationError;

/// Base error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A playback control was issued in a state that does not allow it.
    #[error("playback error")]
    Playback(#[from] PlaybackError),

    /// The external device could not be reached or rejected the request.
    #[error("device error")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// A block or container title is empty.
    #[error("title must not be empty")]
    EmptyTitle,

    /// A command has no name for the device to interpret.
    #[error("command name must not be empty")]
    EmptyCommandName,

    /// A command delay is negative or not a finite number.
    #[error("command delay must be a finite, non-negative number of seconds (got {0})")]
    InvalidDelay(f64),

    /// A duration string could not be parsed.
    #[error("invalid duration")]
    Duration(#[from] DurationError),

    /// A show start time is not a valid `HH:MM` value.
    #[error("invalid time of day {0:?}, expected HH:MM")]
    InvalidTimeOfDay(String),

    /// A reorder request points outside the list it reorders.
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Playback control misuse. These are reported, never fatal to a run.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// `start` was requested on a rundown with no executable blocks.
    #[error("the rundown has no blocks to run")]
    EmptyRun,

    /// `start` was requested while a run is already running or paused.
    #[error("a run is already in progress")]
    AlreadyActive,

    /// The operation requires a running show.
    #[error("the show is not running")]
    NotRunning,

    /// The operation requires a paused show.
    #[error("the show is not paused")]
    NotPaused,

    /// The playback engine task has shut down.
    #[error("the playback engine has stopped")]
    EngineStopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_show_error() {
        let err: ShowError = ValidationError::EmptyTitle.into();
        assert!(matches!(
            err,
            ShowError::Validation(ValidationError::EmptyTitle)
        ));
    }

    #[test]
    fn should_display_not_found_error() {
        let err = NotFoundError {
            entity: "Block",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Block abc not found");
    }

    #[test]
    fn should_display_invalid_delay() {
        let err = ValidationError::InvalidDelay(-1.0);
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn should_convert_playback_error_into_show_error() {
        let err: ShowError = PlaybackError::EmptyRun.into();
        assert!(matches!(err, ShowError::Playback(PlaybackError::EmptyRun)));
    }
}
