//! Rundown repository port: where the current rundown lives.

use std::future::Future;

use rundown_domain::error::ShowError;
use rundown_domain::rundown::Rundown;

/// Holds the single rundown loaded for the show.
pub trait RundownRepository: Send + Sync {
    /// Return a copy of the current rundown.
    fn load(&self) -> impl Future<Output = Result<Rundown, ShowError>> + Send;

    /// Replace the current rundown.
    fn save(&self, rundown: Rundown) -> impl Future<Output = Result<(), ShowError>> + Send;
}

impl<T: RundownRepository> RundownRepository for std::sync::Arc<T> {
    fn load(&self) -> impl Future<Output = Result<Rundown, ShowError>> + Send {
        (**self).load()
    }

    fn save(&self, rundown: Rundown) -> impl Future<Output = Result<(), ShowError>> + Send {
        (**self).save(rundown)
    }
}
