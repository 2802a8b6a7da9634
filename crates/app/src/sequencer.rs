//! Sequencer: work-paced playback of a list of blocks.
//!
//! Each block runs to completion through the [`BlockExecutor`] before the
//! next one starts, separated by a short gap. Pause and stop are
//! cooperative: they are honoured at block boundaries and around the gap,
//! never in the middle of a block.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use rundown_domain::block::Block;
use rundown_domain::error::PlaybackError;
use rundown_domain::log::LogEntry;

use crate::block_executor::BlockExecutor;
use crate::ports::{DeviceControl, LogSink};

/// Default pause between two blocks of a sequence.
pub const DEFAULT_INTER_BLOCK_GAP: Duration = Duration::from_secs(1);

/// Whether the sequencer is advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, Default)]
struct SequenceState {
    status: SequenceStatus,
    /// Incremented on every start so a stopped loop never resumes.
    run: u64,
}

/// Plays blocks one after the other.
pub struct Sequencer<D, L> {
    executor: BlockExecutor<D, L>,
    gap: Duration,
    state: Arc<watch::Sender<SequenceState>>,
}

impl<D, L> Sequencer<D, L>
where
    D: DeviceControl + 'static,
    L: LogSink + 'static,
{
    pub fn new(executor: BlockExecutor<D, L>) -> Self {
        Self {
            executor,
            gap: DEFAULT_INTER_BLOCK_GAP,
            state: Arc::new(watch::channel(SequenceState::default()).0),
        }
    }

    #[must_use]
    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn status(&self) -> SequenceStatus {
        self.state.borrow().status
    }

    /// Run a single block now, outside of any sequence.
    pub async fn execute_block(&self, block: &Block) -> bool {
        self.executor.execute_block(block).await
    }

    /// Start playing `run` from its first block in the background.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::EmptyRun`] when `run` has no blocks; an error is
    ///   logged and nothing changes.
    /// - [`PlaybackError::AlreadyActive`] while a sequence is running or paused.
    pub async fn start(&self, run: Vec<Block>) -> Result<(), PlaybackError> {
        if run.is_empty() {
            self.log(LogEntry::error("Cannot start sequence: no blocks to run"))
                .await;
            return Err(PlaybackError::EmptyRun);
        }

        let mut run_id = 0;
        let started = self.state.send_if_modified(|state| {
            if state.status != SequenceStatus::Idle {
                return false;
            }
            state.status = SequenceStatus::Running;
            state.run = state.run.wrapping_add(1);
            run_id = state.run;
            true
        });
        if !started {
            self.log(LogEntry::warning(
                "Start ignored: a sequence is already in progress",
            ))
            .await;
            return Err(PlaybackError::AlreadyActive);
        }

        self.log(LogEntry::info(format!(
            "Starting sequence with {} blocks",
            run.len()
        )))
        .await;
        tokio::spawn(run_sequence(
            self.executor.clone(),
            Arc::clone(&self.state),
            run,
            run_id,
            self.gap,
        ));
        Ok(())
    }

    /// Hold the sequence at the next block boundary.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotRunning`] unless a sequence is running.
    pub async fn pause(&self) -> Result<(), PlaybackError> {
        if self
            .transition(SequenceStatus::Running, SequenceStatus::Paused)
            .is_none()
        {
            self.log(LogEntry::warning("Pause ignored: the sequence is not running"))
                .await;
            return Err(PlaybackError::NotRunning);
        }
        self.log(LogEntry::warning("Sequence paused")).await;
        Ok(())
    }

    /// Continue a paused sequence from where it stopped.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotPaused`] unless the sequence is paused.
    pub async fn resume(&self) -> Result<(), PlaybackError> {
        if self
            .transition(SequenceStatus::Paused, SequenceStatus::Running)
            .is_none()
        {
            self.log(LogEntry::warning("Resume ignored: the sequence is not paused"))
                .await;
            return Err(PlaybackError::NotPaused);
        }
        self.log(LogEntry::info("Sequence resumed")).await;
        Ok(())
    }

    /// End the sequence. The block currently executing finishes first.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotRunning`] when no sequence is active.
    pub async fn stop(&self) -> Result<(), PlaybackError> {
        let stopped = self.state.send_if_modified(|state| {
            if state.status == SequenceStatus::Idle {
                return false;
            }
            state.status = SequenceStatus::Idle;
            true
        });
        if !stopped {
            self.log(LogEntry::warning("Stop ignored: no sequence is running"))
                .await;
            return Err(PlaybackError::NotRunning);
        }
        self.log(LogEntry::warning("Sequence stopped")).await;
        Ok(())
    }

    fn transition(&self, from: SequenceStatus, to: SequenceStatus) -> Option<()> {
        self.state
            .send_if_modified(|state| {
                if state.status != from {
                    return false;
                }
                state.status = to;
                true
            })
            .then_some(())
    }

    async fn log(&self, entry: LogEntry) {
        self.executor.dispatcher().log().record(entry).await;
    }
}

async fn run_sequence<D, L>(
    executor: BlockExecutor<D, L>,
    state: Arc<watch::Sender<SequenceState>>,
    run: Vec<Block>,
    run_id: u64,
    gap: Duration,
) where
    D: DeviceControl,
    L: LogSink,
{
    let mut updates = state.subscribe();
    for (index, block) in run.iter().enumerate() {
        if !proceed(&mut updates, run_id).await {
            return;
        }
        executor.execute_block(block).await;

        if index + 1 < run.len() {
            if !proceed(&mut updates, run_id).await {
                return;
            }
            tokio::time::sleep(gap).await;
        }
    }
    if !proceed(&mut updates, run_id).await {
        return;
    }

    tracing::info!(blocks = run.len(), "sequence completed");
    executor
        .dispatcher()
        .log()
        .record(LogEntry::success("Sequence completed"))
        .await;
    state.send_if_modified(|current| {
        if current.run != run_id {
            return false;
        }
        current.status = SequenceStatus::Idle;
        true
    });
}

/// Wait out a pause. Returns `false` once the run was stopped or replaced.
async fn proceed(updates: &mut watch::Receiver<SequenceState>, run_id: u64) -> bool {
    loop {
        let current = *updates.borrow_and_update();
        if current.run != run_id {
            return false;
        }
        match current.status {
            SequenceStatus::Running => return true,
            SequenceStatus::Idle => return false,
            SequenceStatus::Paused => {
                if updates.changed().await.is_err() {
                    return false;
                }
            }
        }
    }
}
