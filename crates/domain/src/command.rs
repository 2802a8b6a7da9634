//! Command: one remote-control instruction for the video-production device.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ShowError, ValidationError};
use crate::id::CommandId;

/// A single instruction sent to the device, e.g. `Cut` on input `2`.
///
/// `target` and `value` are passed through untouched; the device decides
/// what an empty string means. `delay` is the pause, in seconds, before the
/// command is issued, counted from the previous command of the same block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    /// Function name understood by the device (`"Cut"`, `"SetText"`, …).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Seconds to wait before dispatch. Absent means zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

impl Command {
    /// Create a builder for constructing a [`Command`].
    #[must_use]
    pub fn builder() -> CommandBuilder {
        CommandBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyCommandName`])
    /// - `delay` is negative, NaN or infinite ([`ValidationError::InvalidDelay`])
    pub fn validate(&self) -> Result<(), ShowError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyCommandName.into());
        }
        if let Some(delay) = self.delay
            && (!delay.is_finite() || delay < 0.0)
        {
            return Err(ValidationError::InvalidDelay(delay).into());
        }
        Ok(())
    }

    /// The wait before this command is issued.
    ///
    /// Delays too large for a [`Duration`] saturate to [`Duration::MAX`].
    #[must_use]
    pub fn delay(&self) -> Duration {
        match self.delay {
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
            }
            _ => Duration::ZERO,
        }
    }

    /// `target` as a string slice, empty when absent.
    #[must_use]
    pub fn target_str(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }

    /// `value` as a string slice, empty when absent.
    #[must_use]
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(target) = self.target.as_deref().filter(|t| !t.is_empty()) {
            write!(f, " on {target}")?;
        }
        if let Some(value) = self.value.as_deref().filter(|v| !v.is_empty()) {
            write!(f, " with value {value}")?;
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Command`].
#[derive(Debug, Default)]
pub struct CommandBuilder {
    id: Option<CommandId>,
    name: Option<String>,
    target: Option<String>,
    value: Option<String>,
    delay: Option<f64>,
}

impl CommandBuilder {
    #[must_use]
    pub fn id(mut self, id: CommandId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = Some(seconds);
        self
    }

    /// Consume the builder, validate, and return a [`Command`].
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] if the name is missing or the delay
    /// is invalid.
    pub fn build(self) -> Result<Command, ShowError> {
        let command = Command {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            target: self.target,
            value: self.value,
            delay: self.delay,
        };
        command.validate()?;
        Ok(command)
    }
}
