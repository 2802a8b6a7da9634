//! Command dispatcher: turns one [`Command`] into one device call.
//!
//! Names are looked up in a handler table that decides which parameters the
//! device receives. Unknown names fall through to a generic passthrough, so
//! new device functions work without touching this module.

use std::collections::HashMap;
use std::time::Duration;

use rundown_domain::command::Command;
use rundown_domain::log::LogEntry;

use crate::ports::{DeviceCall, DeviceControl, LogSink};

/// Default limit for a single device call.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the device call for a command.
pub type Handler = fn(&Command) -> DeviceCall;

/// Sends commands to the device and reports every attempt to the log sink.
///
/// Stateless between calls: a failure never leaves anything behind.
pub struct CommandDispatcher<D, L> {
    device: D,
    log: L,
    handlers: HashMap<&'static str, Handler>,
    timeout: Duration,
}

impl<D, L> CommandDispatcher<D, L>
where
    D: DeviceControl,
    L: LogSink,
{
    /// Create a dispatcher with the built-in handler table.
    pub fn new(device: D, log: L) -> Self {
        Self {
            device,
            log,
            handlers: builtin_handlers(),
            timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add or replace the handler for `name`.
    pub fn register(&mut self, name: &'static str, handler: Handler) {
        self.handlers.insert(name, handler);
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// The device call `command` maps to.
    #[must_use]
    pub fn resolve(&self, command: &Command) -> DeviceCall {
        self.handlers
            .get(command.name.as_str())
            .map_or_else(|| passthrough(command), |handler| handler(command))
    }

    /// Send `command` to the device. Returns `true` when the device
    /// acknowledged it in time.
    ///
    /// Logs one entry before the call and one after. Timeouts and device
    /// errors become `false`.
    pub async fn dispatch(&self, command: &Command) -> bool {
        let call = self.resolve(command);
        self.log
            .record(LogEntry::info(format!("Executing: {command}")))
            .await;

        match tokio::time::timeout(self.timeout, self.device.send_command(&call)).await {
            Ok(Ok(())) => {
                tracing::debug!(%call, "device call succeeded");
                self.log
                    .record(LogEntry::success(format!(
                        "Command completed: {}",
                        command.name
                    )))
                    .await;
                true
            }
            Ok(Err(err)) => {
                tracing::warn!(%call, error = %err, "device call failed");
                self.log
                    .record(LogEntry::error(format!(
                        "Command failed: {}: {}",
                        command.name,
                        error_chain(&err)
                    )))
                    .await;
                false
            }
            Err(_) => {
                tracing::warn!(%call, timeout = ?self.timeout, "device call timed out");
                self.log
                    .record(LogEntry::error(format!(
                        "Command failed: {}: no answer after {} ms",
                        command.name,
                        self.timeout.as_millis()
                    )))
                    .await;
                false
            }
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn builtin_handlers() -> HashMap<&'static str, Handler> {
    let mut handlers: HashMap<&'static str, Handler> = HashMap::new();
    for name in [
        "Cut",
        "Fade",
        "PlayInput",
        "PauseInput",
        "OverlayInput1In",
        "OverlayInput2In",
        "OverlayInput3In",
        "OverlayInput4In",
    ] {
        handlers.insert(name, target_only);
    }
    for name in [
        "OverlayInput1Out",
        "OverlayInput2Out",
        "OverlayInput3Out",
        "OverlayInput4Out",
    ] {
        handlers.insert(name, name_only);
    }
    handlers.insert("SetVolume", numeric_value);
    handlers.insert("SetPosition", numeric_value);
    handlers.insert("SetText", target_and_value);
    handlers
}

fn name_only(command: &Command) -> DeviceCall {
    DeviceCall::new(command.name.as_str())
}

fn target_only(command: &Command) -> DeviceCall {
    DeviceCall::targeted(command.name.as_str(), command.target_str())
}

fn target_and_value(command: &Command) -> DeviceCall {
    target_only(command).with_value(command.value_str())
}

/// The value is sent as a number; anything unparsable counts as zero.
fn numeric_value(command: &Command) -> DeviceCall {
    let number = command
        .value_str()
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0);
    DeviceCall::numeric(command.name.as_str(), command.target_str(), number)
}

fn passthrough(command: &Command) -> DeviceCall {
    target_and_value(command)
}
