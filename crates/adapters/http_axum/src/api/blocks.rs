//! JSON REST handlers for blocks.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_domain::block::{Block, BlockStyle, CustomField};
use rundown_domain::command::Command;
use rundown_domain::error::ShowError;
use rundown_domain::id::{BlockId, ContainerId};

use crate::error::ApiError;
use crate::state::AppState;

/// One command as sent by the editor. Identifiers are assigned server-side.
#[derive(Deserialize)]
pub struct CommandRequest {
    pub name: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    /// Seconds to wait before sending, for manual execution.
    #[serde(default)]
    pub delay: Option<f64>,
}

impl CommandRequest {
    fn into_command(self) -> Result<Command, ShowError> {
        let mut builder = Command::builder().name(self.name);
        if let Some(target) = self.target {
            builder = builder.target(target);
        }
        if let Some(value) = self.value {
            builder = builder.value(value);
        }
        if let Some(delay) = self.delay {
            builder = builder.delay(delay);
        }
        builder.build()
    }
}

/// Editable content of a block.
#[derive(Deserialize)]
pub struct BlockRequest {
    pub title: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub commands: Vec<CommandRequest>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub style: Option<BlockStyle>,
}

impl BlockRequest {
    fn into_block(self, id: Option<BlockId>) -> Result<Block, ShowError> {
        let mut builder = Block::builder().title(self.title);
        if let Some(id) = id {
            builder = builder.id(id);
        }
        if let Some(duration) = self.duration {
            builder = builder.duration(duration);
        }
        if let Some(notes) = self.notes {
            builder = builder.notes(notes);
        }
        if let Some(style) = self.style {
            builder = builder.style(style);
        }
        for field in self.custom_fields {
            builder = builder.custom_field(field.label, field.value);
        }
        for command in self.commands {
            builder = builder.command(command.into_command()?);
        }
        builder.build()
    }
}

/// Request body for creating a block.
#[derive(Deserialize)]
pub struct CreateBlockRequest {
    #[serde(flatten)]
    pub block: BlockRequest,
    /// Append inside this container instead of at the top level.
    #[serde(default)]
    pub container_id: Option<ContainerId>,
}

/// Outcome of a one-off block execution.
#[derive(Serialize)]
pub struct ExecuteResponse {
    /// `true` when every command was acknowledged by the device.
    pub success: bool,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Block>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/blocks/{id}`
pub async fn get<R, D>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<BlockId>,
) -> Result<Json<Block>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let block = state.rundown_service.get_block(id).await?;
    Ok(Json(block))
}

/// `POST /api/blocks`
pub async fn create<R, D>(
    State(state): State<AppState<R, D>>,
    Json(req): Json<CreateBlockRequest>,
) -> Result<CreateResponse, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let block = req.block.into_block(None)?;
    let created = state
        .rundown_service
        .add_block(block, req.container_id)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/blocks/{id}`
pub async fn update<R, D>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<BlockId>,
    Json(req): Json<BlockRequest>,
) -> Result<Json<Block>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let block = req.into_block(Some(id))?;
    let updated = state.rundown_service.update_block(block).await?;
    Ok(Json(updated))
}

/// `DELETE /api/blocks/{id}`
pub async fn delete<R, D>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<BlockId>,
) -> Result<DeleteResponse, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.rundown_service.remove_block(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/blocks/{id}/execute`
///
/// Runs the block's commands now, honouring their delays, and answers once
/// the last one has been sent.
pub async fn execute<R, D>(
    State(state): State<AppState<R, D>>,
    Path(id): Path<BlockId>,
) -> Result<Json<ExecuteResponse>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let block = state.rundown_service.get_block(id).await?;
    let success = state.sequencer.execute_block(&block).await;
    Ok(Json(ExecuteResponse { success }))
}
