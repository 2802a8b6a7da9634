//! # rundown-adapter-virtual
//!
//! Virtual/demo device that stands in for a real video-production device.
//!
//! It accepts every call, remembers it, and answers after an optional
//! simulated latency. Individual functions can be made to fail or to never
//! answer, which is how the engine's error handling is exercised without
//! hardware.
//!
//! ## Dependency rule
//!
//! Depends on `rundown-app` (port traits) and `rundown-domain` only.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rundown_app::ports::{DeviceCall, DeviceControl};
use rundown_domain::error::ShowError;

/// How a function name should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Answer with an error.
    Fail,
    /// Never answer.
    Stall,
}

#[derive(Debug, Default)]
struct Faults {
    failing: HashSet<String>,
    stalling: HashSet<String>,
}

/// Simulated device that records the calls it receives.
#[derive(Debug, Default)]
pub struct VirtualDevice {
    latency: Duration,
    calls: Mutex<Vec<DeviceCall>>,
    faults: Mutex<Faults>,
}

impl VirtualDevice {
    /// A device that answers immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `latency` before answering each call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every call to `function` misbehave.
    pub fn inject(&self, function: &str, fault: Fault) {
        let mut faults = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        match fault {
            Fault::Fail => faults.failing.insert(function.to_string()),
            Fault::Stall => faults.stalling.insert(function.to_string()),
        };
    }

    /// Remove every injected fault.
    pub fn heal(&self) {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner) = Faults::default();
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn fault_for(&self, function: &str) -> Option<Fault> {
        let faults = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        if faults.stalling.contains(function) {
            Some(Fault::Stall)
        } else if faults.failing.contains(function) {
            Some(Fault::Fail)
        } else {
            None
        }
    }
}

impl DeviceControl for VirtualDevice {
    fn send_command(
        &self,
        call: &DeviceCall,
    ) -> impl Future<Output = Result<(), ShowError>> + Send {
        tracing::info!(%call, "virtual device received call");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());
        let fault = self.fault_for(&call.function);
        let latency = self.latency;
        let function = call.function.clone();
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            match fault {
                None => Ok(()),
                Some(Fault::Fail) => Err(ShowError::Device(
                    format!("virtual device rejected {function}").into(),
                )),
                Some(Fault::Stall) => std::future::pending().await,
            }
        }
    }

    fn test_connection(&self) -> impl Future<Output = Result<bool, ShowError>> + Send {
        async { Ok(true) }
    }
}
