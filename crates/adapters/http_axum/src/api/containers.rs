//! JSON REST handlers for containers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_domain::id::ContainerId;
use rundown_domain::rundown::Container;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a container.
#[derive(Deserialize)]
pub struct CreateContainerRequest {
    pub title: String,
}

/// `POST /api/containers`
pub async fn create<R, D>(
    State(state): State<AppState<R, D>>,
    Json(req): Json<CreateContainerRequest>,
) -> Result<(StatusCode, Json<Container>), ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let container = state.rundown_service.add_container(&req.title).await?;
    Ok((StatusCode::CREATED, Json(container)))
}

/// `DELETE /api/containers/{id}`
///
/// The blocks grouped by the container are removed with it.
pub async fn delete<R, D>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<ContainerId>,
) -> Result<StatusCode, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.rundown_service.remove_container(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
