//! Log sink port: the operator console's append-only log.

use std::future::Future;

use rundown_domain::error::ShowError;
use rundown_domain::log::LogEntry;

/// Receives operator-facing log entries. The engine only ever appends.
pub trait LogSink: Send + Sync {
    /// Append an entry to the end of the log.
    fn append(&self, entry: LogEntry) -> impl Future<Output = Result<(), ShowError>> + Send;

    /// Append, reporting a failure through `tracing` instead of the caller.
    fn record(&self, entry: LogEntry) -> impl Future<Output = ()> + Send {
        async move {
            if let Err(err) = self.append(entry).await {
                tracing::warn!(error = %err, "failed to append log entry");
            }
        }
    }
}

impl<T: LogSink> LogSink for std::sync::Arc<T> {
    fn append(&self, entry: LogEntry) -> impl Future<Output = Result<(), ShowError>> + Send {
        (**self).append(entry)
    }
}
