//! Rundown service: use-cases for editing the rundown.
//!
//! Every mutation is load, change, save under one lock, so concurrent edits
//! never overwrite each other. A running show reads the rundown again at
//! every block start and picks the edits up from there.

use serde::Serialize;
use tokio::sync::Mutex;

use rundown_domain::block::Block;
use rundown_domain::error::ShowError;
use rundown_domain::id::{BlockId, ContainerId};
use rundown_domain::rundown::{Container, Rundown, Schedule};
use rundown_domain::time::TimeOfDay;

use crate::ports::RundownRepository;

/// Timing of one executable block within the show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockTiming {
    pub id: BlockId,
    pub title: String,
    /// Canonical duration, `MM:SS` or `HH:MM:SS`.
    pub duration: String,
    /// Running total up to and including this block.
    pub elapsed_at_end: String,
}

/// Totals shown next to the rundown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RundownSummary {
    pub block_count: usize,
    pub total_seconds: u64,
    pub total_duration: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    /// Start time plus total duration, `HH:MM:SS`.
    pub computed_end_time: String,
    pub blocks: Vec<BlockTiming>,
}

impl From<&Rundown> for RundownSummary {
    fn from(rundown: &Rundown) -> Self {
        let total = rundown.total_duration();
        let blocks = rundown
            .blocks()
            .zip(rundown.cumulative_durations())
            .map(|(block, elapsed)| BlockTiming {
                id: block.id,
                title: block.title.clone(),
                duration: block.duration_or_zero().to_string(),
                elapsed_at_end: elapsed.to_string(),
            })
            .collect::<Vec<_>>();
        Self {
            block_count: blocks.len(),
            total_seconds: total.as_secs(),
            total_duration: total.to_string(),
            start_time: rundown.schedule.start_time,
            end_time: rundown.schedule.end_time,
            computed_end_time: rundown.computed_end_time().to_string(),
            blocks,
        }
    }
}

/// Application service for rundown editing.
pub struct RundownService<R> {
    repo: R,
    write: Mutex<()>,
}

impl<R: RundownRepository> RundownService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            write: Mutex::new(()),
        }
    }

    /// The full editable rundown.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn get_rundown(&self) -> Result<Rundown, ShowError> {
        self.repo.load().await
    }

    /// The flattened, executable blocks in playback order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn executable_blocks(&self) -> Result<Vec<Block>, ShowError> {
        Ok(self.repo.load().await?.flatten())
    }

    /// Look up a block by id, wherever it lives.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] when no block with `id` exists.
    pub async fn get_block(&self, id: BlockId) -> Result<Block, ShowError> {
        self.repo
            .load()
            .await?
            .find_block(id)
            .cloned()
            .ok_or_else(|| id.not_found().into())
    }

    /// Totals, running times and the computed end time.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn summary(&self) -> Result<RundownSummary, ShowError> {
        let rundown = self.repo.load().await?;
        Ok(RundownSummary::from(&rundown))
    }

    /// Append a block, at the top level or at the end of a container.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] for an invalid block or
    /// [`ShowError::NotFound`] for an unknown container.
    #[tracing::instrument(skip_all, fields(block = %block.title))]
    pub async fn add_block(
        &self,
        block: Block,
        container: Option<ContainerId>,
    ) -> Result<Block, ShowError> {
        let created = block.clone();
        self.mutate(|rundown| rundown.add_block(block, container))
            .await?;
        tracing::info!(id = %created.id, "block added");
        Ok(created)
    }

    /// Replace a block's content, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] for an invalid block or
    /// [`ShowError::NotFound`] when the block does not exist.
    #[tracing::instrument(skip_all, fields(id = %block.id))]
    pub async fn update_block(&self, block: Block) -> Result<Block, ShowError> {
        let updated = block.clone();
        self.mutate(|rundown| rundown.update_block(block)).await?;
        tracing::info!("block updated");
        Ok(updated)
    }

    /// Remove a block.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] when the block does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn remove_block(&self, id: BlockId) -> Result<Block, ShowError> {
        let removed = self.mutate(|rundown| rundown.remove_block(id)).await?;
        tracing::info!("block removed");
        Ok(removed)
    }

    /// Move a top-level entry from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] when an index is out of range.
    #[tracing::instrument(skip(self))]
    pub async fn reorder(&self, from: usize, to: usize) -> Result<(), ShowError> {
        self.mutate(|rundown| rundown.reorder(from, to)).await
    }

    /// Move a block inside a container.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] for an unknown container or
    /// [`ShowError::Validation`] when an index is out of range.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_in_container(
        &self,
        container: ContainerId,
        from: usize,
        to: usize,
    ) -> Result<(), ShowError> {
        self.mutate(|rundown| rundown.reorder_in_container(container, from, to))
            .await
    }

    /// Create an empty container at the end of the rundown.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::Validation`] when the title is empty.
    #[tracing::instrument(skip(self))]
    pub async fn add_container(&self, title: &str) -> Result<Container, ShowError> {
        let container = Container::new(title)?;
        let created = container.clone();
        self.mutate(|rundown| {
            rundown.add_container(container);
            Ok(())
        })
        .await?;
        tracing::info!(id = %created.id, "container added");
        Ok(created)
    }

    /// Remove a container and the blocks it groups.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] when the container does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn remove_container(&self, id: ContainerId) -> Result<Container, ShowError> {
        self.mutate(|rundown| rundown.remove_container(id)).await
    }

    /// Set the scheduled start and end times.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set_schedule(&self, schedule: Schedule) -> Result<Schedule, ShowError> {
        self.mutate(|rundown| {
            rundown.schedule = schedule;
            Ok(())
        })
        .await?;
        Ok(schedule)
    }

    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Rundown) -> Result<T, ShowError>,
    ) -> Result<T, ShowError> {
        let _guard = self.write.lock().await;
        let mut rundown = self.repo.load().await?;
        let output = change(&mut rundown)?;
        self.repo.save(rundown).await?;
        Ok(output)
    }
}
