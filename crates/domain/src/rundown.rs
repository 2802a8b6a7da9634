//! Rundown: the ordered, optionally grouped list of blocks for a show.
//!
//! The editable view is a list of [`RundownEntry`] values: plain blocks and
//! [`Container`]s that group blocks for display. Playback only ever sees the
//! *flattened* view, where every container is replaced by its children in
//! order and the container itself disappears.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::duration::BlockDuration;
use crate::error::{ShowError, ValidationError};
use crate::id::{BlockId, ContainerId};
use crate::time::TimeOfDay;

/// A non-executable group of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Container {
    /// Create an empty container.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when `title` is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, ShowError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        Ok(Self {
            id: ContainerId::new(),
            title,
            children: Vec::new(),
        })
    }
}

/// One top-level row of the editable rundown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RundownEntry {
    Block(Block),
    Container(Container),
}

/// Show schedule shown next to the rundown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            start_time: TimeOfDay::from_secs_unchecked(20 * 3600),
            end_time: TimeOfDay::from_secs_unchecked(22 * 3600),
        }
    }
}

/// The ordered list of entries for a show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rundown {
    #[serde(default)]
    pub entries: Vec<RundownEntry>,
    #[serde(default)]
    pub schedule: Schedule,
}

impl Rundown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executable blocks in playback order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.entries.iter().flat_map(|entry| match entry {
            RundownEntry::Block(block) => std::slice::from_ref(block).iter(),
            RundownEntry::Container(container) => container.children.iter(),
        })
    }

    /// Owned copy of the flattened executable view.
    #[must_use]
    pub fn flatten(&self) -> Vec<Block> {
        self.blocks().cloned().collect()
    }

    /// Number of executable blocks.
    #[must_use]
    pub fn executable_len(&self) -> usize {
        self.blocks().count()
    }

    /// Block at `index` in the flattened view.
    #[must_use]
    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks().nth(index)
    }

    /// Find a block anywhere in the rundown.
    #[must_use]
    pub fn find_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks().find(|b| b.id == id)
    }

    /// Append a block at the top level, or at the end of `container`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid block, or
    /// [`ShowError::NotFound`] when the container does not exist.
    pub fn add_block(
        &mut self,
        block: Block,
        container: Option<ContainerId>,
    ) -> Result<(), ShowError> {
        block.validate()?;
        match container {
            None => self.entries.push(RundownEntry::Block(block)),
            Some(id) => self.container_mut(id)?.children.push(block),
        }
        Ok(())
    }

    /// Replace the block with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid block, or
    /// [`ShowError::NotFound`] when no block has that id.
    pub fn update_block(&mut self, block: Block) -> Result<(), ShowError> {
        block.validate()?;
        let slot = self.block_mut(block.id)?;
        *slot = block;
        Ok(())
    }

    /// Remove a block wherever it lives.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] when no block has that id.
    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, ShowError> {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| matches!(e, RundownEntry::Block(b) if b.id == id))
        {
            if let RundownEntry::Block(block) = self.entries.remove(pos) {
                return Ok(block);
            }
        }
        for entry in &mut self.entries {
            if let RundownEntry::Container(container) = entry
                && let Some(pos) = container.children.iter().position(|b| b.id == id)
            {
                return Ok(container.children.remove(pos));
            }
        }
        Err(id.not_found().into())
    }

    /// Move the top-level entry at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IndexOutOfRange`] for an invalid index.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ShowError> {
        move_item(&mut self.entries, from, to)
    }

    /// Move a block inside a container.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] for an unknown container or
    /// [`ValidationError::IndexOutOfRange`] for an invalid index.
    pub fn reorder_in_container(
        &mut self,
        container: ContainerId,
        from: usize,
        to: usize,
    ) -> Result<(), ShowError> {
        move_item(&mut self.container_mut(container)?.children, from, to)
    }

    /// Append a container at the top level.
    pub fn add_container(&mut self, container: Container) {
        self.entries.push(RundownEntry::Container(container));
    }

    /// Remove a container together with the blocks it groups.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] when no container has that id.
    pub fn remove_container(&mut self, id: ContainerId) -> Result<Container, ShowError> {
        let pos = self
            .entries
            .iter()
            .position(|e| matches!(e, RundownEntry::Container(c) if c.id == id))
            .ok_or_else(|| id.not_found())?;
        match self.entries.remove(pos) {
            RundownEntry::Container(container) => Ok(container),
            RundownEntry::Block(_) => Err(id.not_found().into()),
        }
    }

    /// Sum of all executable block durations. Missing or unparsable
    /// durations count as zero.
    #[must_use]
    pub fn total_duration(&self) -> BlockDuration {
        self.blocks().map(Block::duration_or_zero).sum()
    }

    /// Running total after each executable block, in playback order.
    #[must_use]
    pub fn cumulative_durations(&self) -> Vec<BlockDuration> {
        self.blocks()
            .scan(BlockDuration::ZERO, |acc, block| {
                *acc = *acc + block.duration_or_zero();
                Some(*acc)
            })
            .collect()
    }

    /// Time of day the show ends if it starts on schedule.
    #[must_use]
    pub fn computed_end_time(&self) -> TimeOfDay {
        self.schedule.start_time.wrapping_add(self.total_duration())
    }

    fn container_mut(&mut self, id: ContainerId) -> Result<&mut Container, ShowError> {
        self.entries
            .iter_mut()
            .find_map(|e| match e {
                RundownEntry::Container(c) if c.id == id => Some(c),
                _ => None,
            })
            .ok_or_else(|| id.not_found().into())
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut Block, ShowError> {
        self.entries
            .iter_mut()
            .flat_map(|entry| match entry {
                RundownEntry::Block(block) => std::slice::from_mut(block).iter_mut(),
                RundownEntry::Container(container) => container.children.iter_mut(),
            })
            .find(|b| b.id == id)
            .ok_or_else(|| id.not_found().into())
    }
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ShowError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len }.into());
        }
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}
