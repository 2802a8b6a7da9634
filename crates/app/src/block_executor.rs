//! Block executor: runs one block's commands in order.

use std::sync::Arc;

use rundown_domain::block::Block;
use rundown_domain::log::LogEntry;

use crate::dispatcher::CommandDispatcher;
use crate::ports::{DeviceControl, LogSink};

/// Dispatches a block's commands one after the other, waiting each
/// command's delay before sending it.
pub struct BlockExecutor<D, L> {
    dispatcher: Arc<CommandDispatcher<D, L>>,
}

impl<D, L> Clone for BlockExecutor<D, L> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<D, L> BlockExecutor<D, L>
where
    D: DeviceControl,
    L: LogSink,
{
    pub fn new(dispatcher: Arc<CommandDispatcher<D, L>>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher<D, L> {
        &self.dispatcher
    }

    /// Execute every command of `block`. Returns `true` iff all of them
    /// succeeded; a block without commands succeeds.
    ///
    /// A failed command does not stop the block.
    #[tracing::instrument(skip_all, fields(block = %block.title))]
    pub async fn execute_block(&self, block: &Block) -> bool {
        tracing::info!(commands = block.commands.len(), "executing block");
        let mut all_succeeded = true;
        for command in &block.commands {
            let delay = command.delay();
            if !delay.is_zero() {
                tracing::debug!(?delay, command = %command.name, "waiting before command");
                tokio::time::sleep(delay).await;
            }
            if !self.dispatcher.dispatch(command).await {
                all_succeeded = false;
            }
        }

        let entry = if all_succeeded {
            LogEntry::success(format!("Block completed: {}", block.title))
        } else {
            LogEntry::warning(format!("Block completed with errors: {}", block.title))
        };
        self.dispatcher.log().record(entry).await;
        all_succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, severities, spy_dispatcher};
    use rundown_domain::command::Command;
    use rundown_domain::log::Severity;
    use std::time::Duration;
    use tokio::time::Instant;

    fn command(name: &str, delay: f64) -> Command {
        Command::builder()
            .name(name)
            .target("1")
            .delay(delay)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_succeed_for_block_without_commands() {
        let (dispatcher, device, log) = spy_dispatcher();
        let executor = BlockExecutor::new(dispatcher);
        let block = Block::builder().title("Empty").build().unwrap();

        assert!(executor.execute_block(&block).await);
        assert!(device.calls().is_empty());
        assert_eq!(messages(&log), vec!["Block completed: Empty"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_honor_delays_in_order() {
        let (dispatcher, device, log) = spy_dispatcher();
        let executor = BlockExecutor::new(dispatcher);
        let block = Block::builder()
            .title("Opening")
            .command(command("Fade", 2.0))
            .command(command("Cut", 0.0))
            .build()
            .unwrap();
        let started = Instant::now();

        let ok = executor.execute_block(&block).await;

        assert!(ok);
        assert!(started.elapsed() >= Duration::from_secs(2));
        let calls = device.calls();
        assert_eq!(calls[0].function, "Fade");
        assert_eq!(calls[1].function, "Cut");
        let times = device.call_times();
        assert!(times[0] - started >= Duration::from_secs(2));
        assert!(times[1] >= times[0]);
        assert_eq!(
            severities(&log),
            vec![
                Severity::Info,
                Severity::Success,
                Severity::Info,
                Severity::Success,
                Severity::Success,
            ]
        );
        assert_eq!(messages(&log)[4], "Block completed: Opening");
    }

    #[tokio::test]
    async fn should_keep_going_after_a_failed_command() {
        let (dispatcher, device, log) = spy_dispatcher();
        device.fail_on("Fade");
        let executor = BlockExecutor::new(dispatcher);
        let block = Block::builder()
            .title("Break")
            .command(command("Fade", 0.0))
            .command(command("Cut", 0.0))
            .build()
            .unwrap();

        let ok = executor.execute_block(&block).await;

        assert!(!ok);
        assert_eq!(device.calls().len(), 2);
        let last = log.history().pop().unwrap();
        assert_eq!(last.severity, Severity::Warning);
        assert_eq!(last.message, "Block completed with errors: Break");
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_out_a_huge_delay_without_panicking() {
        let (dispatcher, device, _) = spy_dispatcher();
        let executor = BlockExecutor::new(dispatcher);
        let block = Block::builder()
            .title("Someday")
            .command(command("Cut", 1e20))
            .build()
            .unwrap();

        let ok = executor.execute_block(&block).await;

        assert!(ok);
        assert_eq!(device.calls().len(), 1);
        assert_eq!(device.calls()[0].function, "Cut");
    }
}
