//! Show timer: duration-driven playback of the rundown.
//!
//! One task owns the [`RunState`]. It is driven by messages on a single
//! queue: control requests sent through a [`ShowHandle`], and elapsed events
//! enqueued by the block timer when a block's time is up. Every run-state
//! mutation happens on that task, so controls racing a firing timer are
//! serialized.
//!
//! Each block stays on air for its configured duration, however long its
//! commands take. The commands are all fired at once when the block starts;
//! per-command delays are not applied here.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use rundown_domain::block::Block;
use rundown_domain::duration::BlockDuration;
use rundown_domain::error::{PlaybackError, ShowError};
use rundown_domain::id::BlockId;
use rundown_domain::log::LogEntry;
use rundown_domain::run_state::{Advance, RunState, RunStatus};
use rundown_domain::time::{Timestamp, now};

use crate::dispatcher::CommandDispatcher;
use crate::ports::{DeviceControl, LogSink, RundownRepository};

const QUEUE_CAPACITY: usize = 32;

type Reply = oneshot::Sender<Result<(), ShowError>>;

enum Message {
    Start(Reply),
    Pause(Reply),
    Resume(Reply),
    Stop(Reply),
    Next(Reply),
    BlockElapsed { token: u64 },
}

/// The block currently on air.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnAirBlock {
    pub id: BlockId,
    pub title: String,
    pub duration: BlockDuration,
}

/// Start instant and length of the block on air.
#[derive(Debug, Clone, Copy)]
struct BlockClock {
    started: Instant,
    total: Duration,
}

impl BlockClock {
    fn remaining(self) -> Duration {
        self.total.saturating_sub(self.started.elapsed())
    }

    fn progress(self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        let ratio = self.started.elapsed().as_secs_f64() / self.total.as_secs_f64();
        (ratio * 100.0).clamp(0.0, 100.0)
    }
}

/// Observable state of the show timer, republished after every message.
#[derive(Debug, Clone, Default)]
pub struct ShowView {
    pub run: RunState,
    pub on_air: Option<OnAirBlock>,
    clock: Option<BlockClock>,
}

impl ShowView {
    /// Share of the current block's duration that has elapsed, in percent.
    ///
    /// Time spent paused counts as elapsed. Returns `0.0` when no timed
    /// block is on air.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.clock.map_or(0.0, BlockClock::progress)
    }

    #[must_use]
    pub fn snapshot(&self) -> ShowSnapshot {
        ShowSnapshot {
            status: self.run.status(),
            current_block_index: self.run.current_block_index(),
            block_started_at: self.run.block_started_at(),
            on_air: self.on_air.clone(),
            progress: self.progress(),
        }
    }
}

/// Point-in-time view of the show for the control surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowSnapshot {
    pub status: RunStatus,
    pub current_block_index: Option<usize>,
    pub block_started_at: Option<Timestamp>,
    pub on_air: Option<OnAirBlock>,
    pub progress: f64,
}

/// One-shot timer whose firing enqueues a `BlockElapsed` message.
///
/// Every arm or cancel bumps the generation, so an elapsed message that was
/// already queued when the timer got cancelled is recognised as stale.
#[derive(Default)]
struct BlockTimer {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl BlockTimer {
    fn arm(&mut self, after: Duration, queue: mpsc::WeakSender<Message>) {
        self.cancel();
        let token = self.generation;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(queue) = queue.upgrade() {
                let _ = queue.send(Message::BlockElapsed { token }).await;
            }
        }));
    }

    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_current(&self, token: u64) -> bool {
        self.task.is_some() && self.generation == token
    }
}

impl Drop for BlockTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Cloneable handle to a running show timer.
///
/// The timer task ends once every handle has been dropped.
#[derive(Clone)]
pub struct ShowHandle {
    sender: mpsc::Sender<Message>,
    view: watch::Receiver<ShowView>,
}

impl ShowHandle {
    /// Start the show at its first block.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::EmptyRun`] when the rundown has no blocks,
    /// [`PlaybackError::AlreadyActive`] when the show is running or paused.
    pub async fn start(&self) -> Result<(), ShowError> {
        self.request(Message::Start).await
    }

    /// Freeze the current block's timer.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotRunning`] unless the show is running.
    pub async fn pause(&self) -> Result<(), ShowError> {
        self.request(Message::Pause).await
    }

    /// Re-arm the timer for what is left of the current block, or move on
    /// when its time ran out during the pause.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotPaused`] unless the show is paused.
    pub async fn resume(&self) -> Result<(), ShowError> {
        self.request(Message::Resume).await
    }

    /// Stop the show and return to idle.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::EngineStopped`] when the timer task is gone.
    pub async fn stop(&self) -> Result<(), ShowError> {
        self.request(Message::Stop).await
    }

    /// Cut the current block short and start the next one.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotRunning`] unless the show is running.
    pub async fn next_block(&self) -> Result<(), ShowError> {
        self.request(Message::Next).await
    }

    #[must_use]
    pub fn view(&self) -> ShowView {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> ShowSnapshot {
        self.view.borrow().snapshot()
    }

    /// See [`ShowView::progress`].
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.view.borrow().progress()
    }

    /// Receive every published [`ShowView`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ShowView> {
        self.view.clone()
    }

    async fn request(&self, message: fn(Reply) -> Message) -> Result<(), ShowError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(message(reply))
            .await
            .map_err(|_| PlaybackError::EngineStopped)?;
        response.await.map_err(|_| PlaybackError::EngineStopped)?
    }
}

/// The task that owns the run state. Build one with [`ShowTimer::spawn`].
pub struct ShowTimer<R, D, L> {
    repo: R,
    dispatcher: Arc<CommandDispatcher<D, L>>,
    state: RunState,
    on_air: Option<OnAirBlock>,
    clock: Option<BlockClock>,
    timer: BlockTimer,
    queue: mpsc::WeakSender<Message>,
    view: watch::Sender<ShowView>,
}

impl<R, D, L> ShowTimer<R, D, L>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
    L: LogSink + 'static,
{
    /// Spawn the timer task on the current runtime.
    pub fn spawn(repo: R, dispatcher: Arc<CommandDispatcher<D, L>>) -> ShowHandle {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let (view, view_receiver) = watch::channel(ShowView::default());
        let timer = Self {
            repo,
            dispatcher,
            state: RunState::new(),
            on_air: None,
            clock: None,
            timer: BlockTimer::default(),
            queue: sender.downgrade(),
            view,
        };
        tokio::spawn(timer.run(receiver));
        ShowHandle {
            sender,
            view: view_receiver,
        }
    }

    async fn run(mut self, mut receiver: mpsc::Receiver<Message>) {
        while let Some(message) = receiver.recv().await {
            let (result, reply) = match message {
                Message::Start(reply) => (self.start().await, Some(reply)),
                Message::Pause(reply) => (self.pause().await, Some(reply)),
                Message::Resume(reply) => (self.resume().await, Some(reply)),
                Message::Stop(reply) => (self.stop().await, Some(reply)),
                Message::Next(reply) => (self.next_manual().await, Some(reply)),
                Message::BlockElapsed { token } => {
                    if self.timer.is_current(token) {
                        self.next_block().await;
                    }
                    (Ok(()), None)
                }
            };
            self.publish();
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
        }
        self.timer.cancel();
        tracing::debug!("show timer task finished");
    }

    async fn start(&mut self) -> Result<(), ShowError> {
        let len = self.repo.load().await?.executable_len();
        if let Err(err) = self.state.start(len) {
            let entry = match err {
                PlaybackError::EmptyRun => {
                    LogEntry::error("Cannot start show: the rundown has no blocks")
                }
                _ => LogEntry::warning("Start ignored: the show is already in progress"),
            };
            self.log(entry).await;
            return Err(err.into());
        }
        tracing::info!(blocks = len, "show started");
        self.log(LogEntry::info(format!("Show started with {len} blocks")))
            .await;
        self.start_block_timer(0).await;
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), ShowError> {
        if let Err(err) = self.state.pause() {
            self.log(LogEntry::warning("Pause ignored: the show is not running"))
                .await;
            return Err(err.into());
        }
        self.pause_timer();
        self.log(LogEntry::warning("Show paused")).await;
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), ShowError> {
        if let Err(err) = self.state.resume() {
            self.log(LogEntry::warning("Resume ignored: the show is not paused"))
                .await;
            return Err(err.into());
        }
        self.log(LogEntry::info("Show resumed")).await;
        self.resume_timer().await;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ShowError> {
        self.stop_timer();
        self.state.stop();
        self.on_air = None;
        tracing::info!("show stopped");
        self.log(LogEntry::warning("Show stopped")).await;
        Ok(())
    }

    async fn next_manual(&mut self) -> Result<(), ShowError> {
        if self.state.status() != RunStatus::Running {
            self.log(LogEntry::warning("Next block ignored: the show is not running"))
                .await;
            return Err(PlaybackError::NotRunning.into());
        }
        self.log(LogEntry::info("Skipping to the next block")).await;
        self.next_block().await;
        Ok(())
    }

    /// Put the block at `index` on air and arm its timer.
    ///
    /// Blocks with a missing, unparsable or zero duration are skipped on the
    /// spot, without firing their commands.
    async fn start_block_timer(&mut self, mut index: usize) {
        loop {
            let blocks = self.load_blocks().await;
            let len = blocks.len();
            let Some(block) = blocks.get(index) else {
                // The rundown shrank under the run.
                match self.advance(len).await {
                    Some(next) => {
                        index = next;
                        continue;
                    }
                    None => return,
                }
            };
            let Some(duration) = block.timed_duration() else {
                tracing::warn!(index, block = %block.title, "block has no usable duration");
                self.log(LogEntry::warning(format!(
                    "Block without duration, skipping: {}",
                    block.title
                )))
                .await;
                match self.advance(len).await {
                    Some(next) => {
                        index = next;
                        continue;
                    }
                    None => return,
                }
            };

            self.clock = Some(BlockClock {
                started: Instant::now(),
                total: duration.to_std(),
            });
            self.state.mark_block_started(now());
            self.on_air = Some(OnAirBlock {
                id: block.id,
                title: block.title.clone(),
                duration,
            });
            tracing::info!(index, block = %block.title, %duration, "block on air");
            self.log(LogEntry::info(format!(
                "Starting block: {} ({duration})",
                block.title
            )))
            .await;
            self.fire_commands(block);
            self.timer.arm(duration.to_std(), self.queue.clone());
            return;
        }
    }

    fn fire_commands(&self, block: &Block) {
        for command in block.commands.iter().cloned() {
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                dispatcher.dispatch(&command).await;
            });
        }
    }

    /// Leave the current block. Does nothing unless the show is running.
    async fn next_block(&mut self) {
        self.timer.cancel();
        if self.state.status() != RunStatus::Running {
            return;
        }
        let len = self.load_blocks().await.len();
        if let Some(next) = self.advance(len).await {
            self.start_block_timer(next).await;
        }
    }

    fn pause_timer(&mut self) {
        self.timer.cancel();
    }

    async fn resume_timer(&mut self) {
        if self.state.status() != RunStatus::Running
            || self.state.current_block_index().is_none()
        {
            return;
        }
        let Some(clock) = self.clock else {
            return;
        };
        let remaining = clock.remaining();
        if remaining.is_zero() {
            tracing::debug!("block ran out while paused");
            self.next_block().await;
        } else {
            self.timer.arm(remaining, self.queue.clone());
        }
    }

    fn stop_timer(&mut self) {
        self.timer.cancel();
        self.clock = None;
    }

    /// Move the run state past the current block. Returns the index to put
    /// on air next, or `None` once the show is over.
    async fn advance(&mut self, len: usize) -> Option<usize> {
        match self.state.advance(len) {
            Ok(Advance::Next(index)) => {
                self.clock = None;
                self.on_air = None;
                Some(index)
            }
            Ok(Advance::Completed) => {
                self.clock = None;
                self.on_air = None;
                tracing::info!("show completed");
                self.log(LogEntry::success("Show completed")).await;
                None
            }
            Err(_) => None,
        }
    }

    async fn load_blocks(&self) -> Vec<Block> {
        match self.repo.load().await {
            Ok(rundown) => rundown.flatten(),
            Err(err) => {
                tracing::error!(error = %err, "failed to load rundown");
                self.log(LogEntry::error(format!("Cannot load rundown: {err}")))
                    .await;
                Vec::new()
            }
        }
    }

    fn publish(&self) {
        self.view.send_replace(ShowView {
            run: self.state.clone(),
            on_air: self.on_air.clone(),
            clock: self.clock,
        });
    }

    async fn log(&self, entry: LogEntry) {
        self.dispatcher.log().record(entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_bus::InProcessLogBus;
    use crate::rundown_store::InMemoryRundownStore;
    use crate::testing::{SpyDevice, severities, spy_dispatcher};
    use rundown_domain::command::Command;
    use rundown_domain::log::Severity;
    use rundown_domain::rundown::Rundown;
    use tokio::time::{sleep, sleep_until};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn block(title: &str, duration: Option<&str>, commands: &[&str]) -> Block {
        let mut builder = Block::builder().title(title);
        if let Some(duration) = duration {
            builder = builder.duration(duration);
        }
        for name in commands {
            builder = builder.command(Command::builder().name(*name).target("1").build().unwrap());
        }
        builder.build().unwrap()
    }

    fn spawn(
        blocks: Vec<Block>,
    ) -> (
        ShowHandle,
        Arc<InMemoryRundownStore>,
        Arc<SpyDevice>,
        Arc<InProcessLogBus>,
    ) {
        let mut rundown = Rundown::new();
        for block in blocks {
            rundown.add_block(block, None).unwrap();
        }
        let store = Arc::new(InMemoryRundownStore::new(rundown));
        let (dispatcher, device, log) = spy_dispatcher();
        let handle = ShowTimer::spawn(Arc::clone(&store), dispatcher);
        (handle, store, device, log)
    }

    fn functions(device: &SpyDevice) -> Vec<String> {
        device.calls().into_iter().map(|c| c.function).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn should_advance_by_block_duration_until_completed() {
        let (show, _, device, _) = spawn(vec![
            block("A", Some("00:02"), &["Cut"]),
            block("B", Some("00:03"), &[]),
        ]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        sleep(ms(10)).await;
        assert_eq!(functions(&device), vec!["Cut"]);
        assert!(device.call_times()[0].duration_since(t0) < ms(10));
        assert_eq!(show.snapshot().current_block_index, Some(0));

        sleep_until(t0 + ms(1900)).await;
        assert_eq!(show.snapshot().current_block_index, Some(0));

        sleep_until(t0 + ms(2100)).await;
        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Running);
        assert_eq!(snapshot.current_block_index, Some(1));
        assert_eq!(snapshot.on_air.unwrap().title, "B");

        sleep_until(t0 + ms(5100)).await;
        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Completed);
        assert_eq!(snapshot.current_block_index, None);
        assert!(snapshot.on_air.is_none());
        assert_eq!(functions(&device), vec!["Cut"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_refire_commands_on_resume() {
        let (show, _, device, _) = spawn(vec![block("A", Some("00:10"), &["Cut"])]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        sleep_until(t0 + ms(3000)).await;
        show.pause().await.unwrap();
        assert_eq!(show.snapshot().status, RunStatus::Paused);

        sleep_until(t0 + ms(5000)).await;
        show.resume().await.unwrap();
        sleep(ms(10)).await;
        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Running);
        assert_eq!(snapshot.current_block_index, Some(0));
        assert_eq!(functions(&device), vec!["Cut"]);

        sleep_until(t0 + ms(9900)).await;
        assert_eq!(show.snapshot().status, RunStatus::Running);

        sleep_until(t0 + ms(10_100)).await;
        assert_eq!(show.snapshot().status, RunStatus::Completed);
        assert_eq!(functions(&device), vec!["Cut"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_advance_immediately_when_block_ran_out_while_paused() {
        let (show, _, device, _) = spawn(vec![
            block("A", Some("00:02"), &["Cut"]),
            block("B", Some("00:05"), &["Fade"]),
        ]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        sleep_until(t0 + ms(1000)).await;
        show.pause().await.unwrap();
        sleep_until(t0 + ms(4000)).await;
        assert_eq!(show.snapshot().current_block_index, Some(0));

        show.resume().await.unwrap();
        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Running);
        assert_eq!(snapshot.current_block_index, Some(1));

        sleep(ms(10)).await;
        assert_eq!(functions(&device), vec!["Cut", "Fade"]);

        sleep_until(t0 + ms(8900)).await;
        assert_eq!(show.snapshot().current_block_index, Some(1));
        sleep_until(t0 + ms(9100)).await;
        assert_eq!(show.snapshot().status, RunStatus::Completed);
    }

    #[tokio::test]
    async fn should_stay_idle_and_log_error_on_empty_start() {
        let (show, _, _, log) = spawn(Vec::new());

        let result = show.start().await;

        assert!(matches!(
            result,
            Err(ShowError::Playback(PlaybackError::EmptyRun))
        ));
        assert_eq!(show.snapshot().status, RunStatus::Idle);
        assert_eq!(show.snapshot().current_block_index, None);
        assert_eq!(severities(&log), vec![Severity::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_skip_blocks_without_usable_duration() {
        let (show, _, device, log) = spawn(vec![
            block("No duration", None, &["Cut"]),
            block("Garbage", Some("abc"), &["Fade"]),
            block("Zero", Some("00:00"), &["PlayInput"]),
            block("Timed", Some("00:01"), &["SetText"]),
        ]);

        show.start().await.unwrap();
        assert_eq!(show.snapshot().current_block_index, Some(3));
        sleep(ms(10)).await;
        assert_eq!(functions(&device), vec!["SetText"]);
        let warnings = severities(&log)
            .into_iter()
            .filter(|s| *s == Severity::Warning)
            .count();
        assert_eq!(warnings, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_complete_when_only_untimed_blocks_remain() {
        let (show, _, device, _) = spawn(vec![block("Manual", None, &["Cut"])]);

        show.start().await.unwrap();

        assert_eq!(show.snapshot().status, RunStatus::Completed);
        sleep(ms(10)).await;
        assert!(device.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_cancel_timer_on_stop() {
        let (show, _, device, _) = spawn(vec![
            block("A", Some("00:05"), &["Cut"]),
            block("B", Some("00:05"), &["Fade"]),
        ]);

        show.start().await.unwrap();
        sleep(ms(1000)).await;
        show.stop().await.unwrap();
        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Idle);
        assert_eq!(snapshot.current_block_index, None);
        assert!(snapshot.progress.abs() < f64::EPSILON);

        sleep(ms(10_000)).await;
        assert_eq!(show.snapshot().status, RunStatus::Idle);
        assert_eq!(functions(&device), vec!["Cut"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_skip_to_next_block_on_request() {
        let (show, _, device, _) = spawn(vec![
            block("A", Some("00:10"), &["Cut"]),
            block("B", Some("00:10"), &["Fade"]),
        ]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        sleep_until(t0 + ms(1000)).await;
        show.next_block().await.unwrap();
        assert_eq!(show.snapshot().current_block_index, Some(1));

        sleep_until(t0 + ms(10_500)).await;
        assert_eq!(show.snapshot().current_block_index, Some(1));
        sleep_until(t0 + ms(11_100)).await;
        assert_eq!(show.snapshot().status, RunStatus::Completed);
        assert_eq!(functions(&device), vec!["Cut", "Fade"]);
    }

    #[tokio::test]
    async fn should_ignore_next_when_not_running() {
        let (show, _, _, log) = spawn(vec![block("A", Some("00:10"), &[])]);

        let result = show.next_block().await;

        assert!(matches!(
            result,
            Err(ShowError::Playback(PlaybackError::NotRunning))
        ));
        assert_eq!(show.snapshot().status, RunStatus::Idle);
        assert_eq!(severities(&log), vec![Severity::Warning]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_next_while_paused() {
        let (show, _, _, _) = spawn(vec![
            block("A", Some("00:10"), &[]),
            block("B", Some("00:10"), &[]),
        ]);

        show.start().await.unwrap();
        show.pause().await.unwrap();
        assert!(show.next_block().await.is_err());
        assert_eq!(show.snapshot().current_block_index, Some(0));
        assert_eq!(show.snapshot().status, RunStatus::Paused);
    }

    #[tokio::test]
    async fn should_log_warning_when_pause_or_resume_is_refused() {
        let (show, _, _, log) = spawn(vec![block("A", Some("00:10"), &["Cut"])]);

        let paused = show.pause().await;
        let resumed = show.resume().await;

        assert!(matches!(
            paused,
            Err(ShowError::Playback(PlaybackError::NotRunning))
        ));
        assert!(matches!(
            resumed,
            Err(ShowError::Playback(PlaybackError::NotPaused))
        ));
        assert_eq!(show.snapshot().status, RunStatus::Idle);
        assert_eq!(severities(&log), vec![Severity::Warning, Severity::Warning]);
        let messages: Vec<_> = log.history().into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "Pause ignored: the show is not running",
                "Resume ignored: the show is not paused",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_block_when_resumed_right_after_pause() {
        let (show, _, device, _) = spawn(vec![
            block("A", Some("00:10"), &["Cut"]),
            block("B", Some("00:10"), &["Fade"]),
        ]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        show.pause().await.unwrap();
        show.resume().await.unwrap();

        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Running);
        assert_eq!(snapshot.current_block_index, Some(0));
        sleep(ms(10)).await;
        assert_eq!(functions(&device), vec!["Cut"]);

        sleep_until(t0 + ms(9900)).await;
        assert_eq!(show.snapshot().current_block_index, Some(0));
        sleep_until(t0 + ms(10_100)).await;
        assert_eq!(show.snapshot().current_block_index, Some(1));
        assert_eq!(functions(&device), vec!["Cut", "Fade"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_progress_of_current_block() {
        let (show, _, _, _) = spawn(vec![block("A", Some("00:10"), &[])]);
        let t0 = Instant::now();

        assert!(show.progress().abs() < f64::EPSILON);
        show.start().await.unwrap();
        sleep_until(t0 + ms(5000)).await;
        assert!((show.progress() - 50.0).abs() < 1.0);

        sleep_until(t0 + ms(10_100)).await;
        assert!(show.progress().abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn should_restart_from_first_block_after_completion() {
        let (show, _, device, _) = spawn(vec![block("A", Some("00:01"), &["Cut"])]);

        show.start().await.unwrap();
        sleep(ms(1100)).await;
        assert_eq!(show.snapshot().status, RunStatus::Completed);

        show.start().await.unwrap();
        let snapshot = show.snapshot();
        assert_eq!(snapshot.status, RunStatus::Running);
        assert_eq!(snapshot.current_block_index, Some(0));
        sleep(ms(10)).await;
        assert_eq!(functions(&device), vec!["Cut", "Cut"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_refuse_start_while_running() {
        let (show, _, _, log) = spawn(vec![block("A", Some("00:05"), &[])]);

        show.start().await.unwrap();
        let again = show.start().await;

        assert!(matches!(
            again,
            Err(ShowError::Playback(PlaybackError::AlreadyActive))
        ));
        let last = log.history().pop().unwrap();
        assert_eq!(last.severity, Severity::Warning);
        assert_eq!(last.message, "Start ignored: the show is already in progress");
    }

    #[tokio::test(start_paused = true)]
    async fn should_pick_up_edits_on_next_block_start() {
        let (show, store, device, _) = spawn(vec![
            block("A", Some("00:02"), &["Cut"]),
            block("B", Some("00:02"), &["Cut"]),
        ]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        sleep_until(t0 + ms(1000)).await;
        let mut rundown = store.load().await.unwrap();
        let mut edited = rundown.block_at(1).cloned().unwrap();
        edited.commands = vec![Command::builder().name("Fade").build().unwrap()];
        rundown.update_block(edited).unwrap();
        store.save(rundown).await.unwrap();

        sleep_until(t0 + ms(2100)).await;
        assert_eq!(functions(&device), vec!["Cut", "Fade"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_all_commands_at_block_start_ignoring_delays() {
        let mut a = block("A", Some("00:05"), &["Cut", "Fade"]);
        a.commands.push(
            Command::builder()
                .name("SetText")
                .delay(30.0)
                .build()
                .unwrap(),
        );
        let (show, _, device, _) = spawn(vec![a]);
        let t0 = Instant::now();

        show.start().await.unwrap();
        sleep(ms(10)).await;

        assert_eq!(device.calls().len(), 3);
        assert!(
            device
                .call_times()
                .iter()
                .all(|at| at.duration_since(t0) < ms(10))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_every_change() {
        let (show, _, _, _) = spawn(vec![block("A", Some("00:01"), &[])]);
        let mut updates = show.subscribe();

        show.start().await.unwrap();
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().run.status(), RunStatus::Running);

        updates.changed().await.unwrap();
        assert_eq!(
            updates.borrow_and_update().run.status(),
            RunStatus::Completed
        );
    }
}
