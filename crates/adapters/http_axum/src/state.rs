//! Shared application state for axum handlers.

use std::sync::Arc;

use rundown_app::dispatcher::CommandDispatcher;
use rundown_app::log_bus::InProcessLogBus;
use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_app::sequencer::Sequencer;
use rundown_app::services::rundown_service::RundownService;
use rundown_app::show_timer::ShowHandle;

/// Command dispatcher wired to the in-process log bus.
pub type Dispatcher<D> = CommandDispatcher<D, Arc<InProcessLogBus>>;

/// Application state shared across all axum handlers.
///
/// Generic over the rundown repository and the device so handlers stay
/// statically dispatched. `Clone` is implemented manually so only the `Arc`
/// wrappers and the show handle are cloned.
pub struct AppState<R, D> {
    /// Rundown editing service.
    pub rundown_service: Arc<RundownService<R>>,
    /// Handle to the duration-driven show timer.
    pub show: ShowHandle,
    /// Work-paced sequencer, also used for one-off block execution.
    pub sequencer: Arc<Sequencer<D, Arc<InProcessLogBus>>>,
    /// Dispatcher shared with the engines; used for device status.
    pub dispatcher: Arc<Dispatcher<D>>,
    /// Operator log.
    pub log_bus: Arc<InProcessLogBus>,
}

impl<R, D> Clone for AppState<R, D> {
    fn clone(&self) -> Self {
        Self {
            rundown_service: Arc::clone(&self.rundown_service),
            show: self.show.clone(),
            sequencer: Arc::clone(&self.sequencer),
            dispatcher: Arc::clone(&self.dispatcher),
            log_bus: Arc::clone(&self.log_bus),
        }
    }
}

impl<R, D> AppState<R, D>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The engines are spawned by the caller so they can be shared with
    /// other tasks before the HTTP state exists.
    pub fn from_arcs(
        rundown_service: Arc<RundownService<R>>,
        show: ShowHandle,
        sequencer: Arc<Sequencer<D, Arc<InProcessLogBus>>>,
        dispatcher: Arc<Dispatcher<D>>,
        log_bus: Arc<InProcessLogBus>,
    ) -> Self {
        Self {
            rundown_service,
            show,
            sequencer,
            dispatcher,
            log_bus,
        }
    }
}
