//! Block: one segment of the show with its duration and commands.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::duration::{BlockDuration, DurationError};
use crate::error::{ShowError, ValidationError};
use crate::id::BlockId;

/// One schedulable segment of a rundown.
///
/// `duration` keeps the operator's text as entered. A block without a
/// parsable duration can still be executed manually but is skipped by the
/// timed playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Free-form editor fields; never read by playback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    /// Cosmetic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
}

/// An editor-defined field attached to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

/// Display styling for a block row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl Block {
    /// Create a builder for constructing a [`Block`].
    #[must_use]
    pub fn builder() -> BlockBuilder {
        BlockBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// The duration text is not checked; timed playback skips blocks whose
    /// duration does not parse.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] when the title is empty or any
    /// command is invalid.
    pub fn validate(&self) -> Result<(), ShowError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        for command in &self.commands {
            command.validate()?;
        }
        Ok(())
    }

    /// Parse the duration text.
    ///
    /// Returns `None` when the block has no duration at all.
    #[must_use]
    pub fn parsed_duration(&self) -> Option<Result<BlockDuration, DurationError>> {
        self.duration.as_deref().map(str::parse)
    }

    /// The on-air time for timed playback, if the block has a usable one.
    ///
    /// Missing, unparsable and zero durations all yield `None`.
    #[must_use]
    pub fn timed_duration(&self) -> Option<BlockDuration> {
        self.parsed_duration()
            .and_then(Result::ok)
            .filter(|d| !d.is_zero())
    }

    /// Duration contribution to rundown totals (zero when missing or invalid).
    #[must_use]
    pub fn duration_or_zero(&self) -> BlockDuration {
        self.parsed_duration()
            .and_then(Result::ok)
            .unwrap_or_default()
    }
}

/// Step-by-step builder for [`Block`].
#[derive(Debug, Default)]
pub struct BlockBuilder {
    id: Option<BlockId>,
    title: Option<String>,
    duration: Option<String>,
    commands: Vec<Command>,
    notes: Option<String>,
    custom_fields: Vec<CustomField>,
    style: Option<BlockStyle>,
}

impl BlockBuilder {
    #[must_use]
    pub fn id(mut self, id: BlockId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn custom_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.push(CustomField {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn style(mut self, style: BlockStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Consume the builder, validate, and return a [`Block`].
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] if the title is missing or a command
    /// is invalid.
    pub fn build(self) -> Result<Block, ShowError> {
        let block = Block {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            duration: self.duration,
            commands: self.commands,
            notes: self.notes,
            custom_fields: self.custom_fields,
            style: self.style,
        };
        block.validate()?;
        Ok(block)
    }
}
