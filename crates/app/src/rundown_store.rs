//! In-memory [`RundownRepository`].

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use rundown_domain::error::ShowError;
use rundown_domain::rundown::Rundown;

use crate::ports::RundownRepository;

/// Keeps the rundown in process memory. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryRundownStore {
    rundown: Mutex<Rundown>,
}

impl InMemoryRundownStore {
    /// Create a store holding `rundown`.
    #[must_use]
    pub fn new(rundown: Rundown) -> Self {
        Self {
            rundown: Mutex::new(rundown),
        }
    }
}

impl RundownRepository for InMemoryRundownStore {
    fn load(&self) -> impl Future<Output = Result<Rundown, ShowError>> + Send {
        let rundown = self
            .rundown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        async { Ok(rundown) }
    }

    fn save(&self, rundown: Rundown) -> impl Future<Output = Result<(), ShowError>> + Send {
        *self.rundown.lock().unwrap_or_else(PoisonError::into_inner) = rundown;
        async { Ok(()) }
    }
}
