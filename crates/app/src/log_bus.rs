//! In-process log bus backed by a tokio broadcast channel.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use rundown_domain::error::ShowError;
use rundown_domain::log::{LogEntry, Severity};

use crate::ports::LogSink;

/// Operator log kept in memory and fanned out to live subscribers.
///
/// Every appended entry is kept in an ordered history and then broadcast.
/// Appending succeeds even when there are no active subscribers.
pub struct InProcessLogBus {
    sender: broadcast::Sender<LogEntry>,
    history: Mutex<Vec<LogEntry>>,
}

impl InProcessLogBus {
    /// Create a new log bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to entries appended *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }

    /// All entries appended so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for InProcessLogBus {
    fn append(&self, entry: LogEntry) -> impl Future<Output = Result<(), ShowError>> + Send {
        match entry.severity {
            Severity::Error => tracing::error!(target: "console", "{}", entry.message),
            Severity::Warning => tracing::warn!(target: "console", "{}", entry.message),
            Severity::Info | Severity::Success => {
                tracing::debug!(target: "console", "{}", entry.message);
            }
        }
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        // Fails only when nobody is subscribed.
        let _ = self.sender.send(entry);
        async { Ok(()) }
    }
}
