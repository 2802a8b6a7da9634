//! Playback controls for the duration-driven show timer.
//!
//! Every control answers with the show snapshot taken right after the
//! command was applied.

use axum::Json;
use axum::extract::State;

use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_app::show_timer::ShowSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/show`
pub async fn get<R, D>(State(state): State<AppState<R, D>>) -> Json<ShowSnapshot>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    Json(state.show.snapshot())
}

/// `POST /api/show/start`
pub async fn start<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<ShowSnapshot>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.show.start().await?;
    Ok(Json(state.show.snapshot()))
}

/// `POST /api/show/pause`
pub async fn pause<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<ShowSnapshot>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.show.pause().await?;
    Ok(Json(state.show.snapshot()))
}

/// `POST /api/show/resume`
pub async fn resume<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<ShowSnapshot>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.show.resume().await?;
    Ok(Json(state.show.snapshot()))
}

/// `POST /api/show/stop`
pub async fn stop<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<ShowSnapshot>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.show.stop().await?;
    Ok(Json(state.show.snapshot()))
}

/// `POST /api/show/next`: cut the current block short.
pub async fn next<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<ShowSnapshot>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.show.next_block().await?;
    Ok(Json(state.show.snapshot()))
}
