//! JSON REST handlers for the rundown as a whole.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_app::services::rundown_service::RundownSummary;
use rundown_domain::id::ContainerId;
use rundown_domain::rundown::{Rundown, Schedule};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for moving an entry.
///
/// Without `container_id` the top-level entries are reordered; with it, the
/// blocks inside that container are.
#[derive(Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub container_id: Option<ContainerId>,
}

/// `GET /api/rundown`
pub async fn get<R, D>(State(state): State<AppState<R, D>>) -> Result<Json<Rundown>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let rundown = state.rundown_service.get_rundown().await?;
    Ok(Json(rundown))
}

/// `PUT /api/rundown/schedule`
pub async fn set_schedule<R, D>(
    State(state): State<AppState<R, D>>,
    Json(schedule): Json<Schedule>,
) -> Result<Json<Schedule>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let schedule = state.rundown_service.set_schedule(schedule).await?;
    Ok(Json(schedule))
}

/// `GET /api/rundown/summary`
pub async fn summary<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<RundownSummary>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let summary = state.rundown_service.summary().await?;
    Ok(Json(summary))
}

/// `POST /api/entries/reorder`
pub async fn reorder<R, D>(
    State(state): State<AppState<R, D>>,
    Json(req): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    match req.container_id {
        Some(container) => {
            state
                .rundown_service
                .reorder_in_container(container, req.from, req.to)
                .await?;
        }
        None => state.rundown_service.reorder(req.from, req.to).await?,
    }
    Ok(StatusCode::NO_CONTENT)
}
