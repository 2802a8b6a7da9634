//! Test doubles shared by the engine test modules.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use rundown_domain::error::ShowError;
use rundown_domain::log::{LogEntry, Severity};

use crate::dispatcher::CommandDispatcher;
use crate::log_bus::InProcessLogBus;
use crate::ports::{DeviceCall, DeviceControl};

/// Device double that records every call and can be told to fail or hang.
#[derive(Default)]
pub(crate) struct SpyDevice {
    calls: Mutex<Vec<(Instant, DeviceCall)>>,
    failing: Mutex<HashSet<String>>,
    stalling: Mutex<HashSet<String>>,
}

impl SpyDevice {
    pub(crate) fn fail_on(&self, function: &str) {
        self.failing.lock().unwrap().insert(function.to_string());
    }

    pub(crate) fn stall_on(&self, function: &str) {
        self.stalling.lock().unwrap().insert(function.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<DeviceCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }
}

impl DeviceControl for SpyDevice {
    fn send_command(
        &self,
        call: &DeviceCall,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), call.clone()));
        let fail = self.failing.lock().unwrap().contains(&call.function);
        let stall = self.stalling.lock().unwrap().contains(&call.function);
        async move {
            if stall {
                std::future::pending::<()>().await;
            }
            if fail {
                Err(ShowError::Device("device rejected the call".into()))
            } else {
                Ok(())
            }
        }
    }

    fn test_connection(&self) -> impl Future<Output = Result<bool, ShowError>> + Send {
        async { Ok(true) }
    }
}

pub(crate) type SpyDispatcher = CommandDispatcher<Arc<SpyDevice>, Arc<InProcessLogBus>>;

/// A dispatcher wired to a fresh spy device and log bus.
pub(crate) fn spy_dispatcher() -> (Arc<SpyDispatcher>, Arc<SpyDevice>, Arc<InProcessLogBus>) {
    let device = Arc::new(SpyDevice::default());
    let log = Arc::new(InProcessLogBus::new(64));
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&device),
        Arc::clone(&log),
    ));
    (dispatcher, device, log)
}

pub(crate) fn severities(log: &InProcessLogBus) -> Vec<Severity> {
    log.history().iter().map(|e| e.severity).collect()
}

pub(crate) fn messages(log: &InProcessLogBus) -> Vec<String> {
    log.history().into_iter().map(|e: LogEntry| e.message).collect()
}
