//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod blocks;
#[allow(clippy::missing_errors_doc)]
pub mod containers;
#[allow(clippy::missing_errors_doc)]
pub mod device;
#[allow(clippy::missing_errors_doc)]
pub mod logs;
#[allow(clippy::missing_errors_doc)]
pub mod rundown;
#[allow(clippy::missing_errors_doc)]
pub mod sequence;
#[allow(clippy::missing_errors_doc)]
pub mod show;

use axum::Router;
use axum::routing::{delete, get, post, put};

use rundown_app::ports::{DeviceControl, RundownRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, D>() -> Router<AppState<R, D>>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    Router::new()
        // Rundown
        .route("/rundown", get(rundown::get::<R, D>))
        .route("/rundown/schedule", put(rundown::set_schedule::<R, D>))
        .route("/rundown/summary", get(rundown::summary::<R, D>))
        .route("/entries/reorder", post(rundown::reorder::<R, D>))
        // Blocks
        .route("/blocks", post(blocks::create::<R, D>))
        .route(
            "/blocks/{id}",
            get(blocks::get::<R, D>)
                .put(blocks::update::<R, D>)
                .delete(blocks::delete::<R, D>),
        )
        .route("/blocks/{id}/execute", post(blocks::execute::<R, D>))
        // Containers
        .route("/containers", post(containers::create::<R, D>))
        .route("/containers/{id}", delete(containers::delete::<R, D>))
        // Show timer
        .route("/show", get(show::get::<R, D>))
        .route("/show/start", post(show::start::<R, D>))
        .route("/show/pause", post(show::pause::<R, D>))
        .route("/show/resume", post(show::resume::<R, D>))
        .route("/show/stop", post(show::stop::<R, D>))
        .route("/show/next", post(show::next::<R, D>))
        // Sequencer
        .route("/sequence", get(sequence::get::<R, D>))
        .route("/sequence/start", post(sequence::start::<R, D>))
        .route("/sequence/pause", post(sequence::pause::<R, D>))
        .route("/sequence/resume", post(sequence::resume::<R, D>))
        .route("/sequence/stop", post(sequence::stop::<R, D>))
        // Operator log
        .route("/logs", get(logs::list::<R, D>))
        .route("/logs/stream", get(logs::stream::<R, D>))
        // Device
        .route("/device/status", get(device::status::<R, D>))
}
