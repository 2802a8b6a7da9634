//! Playback controls for the work-paced sequencer.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_app::sequencer::SequenceStatus;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of every sequencer response.
#[derive(Serialize)]
pub struct SequenceResponse {
    pub status: SequenceStatus,
}

fn respond<R, D>(state: &AppState<R, D>) -> Json<SequenceResponse>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    Json(SequenceResponse {
        status: state.sequencer.status(),
    })
}

/// `GET /api/sequence`
pub async fn get<R, D>(State(state): State<AppState<R, D>>) -> Json<SequenceResponse>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    respond(&state)
}

/// `POST /api/sequence/start`: play the executable blocks from the top.
pub async fn start<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<SequenceResponse>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let blocks = state.rundown_service.executable_blocks().await?;
    state.sequencer.start(blocks).await?;
    Ok(respond(&state))
}

/// `POST /api/sequence/pause`
pub async fn pause<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<SequenceResponse>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.sequencer.pause().await?;
    Ok(respond(&state))
}

/// `POST /api/sequence/resume`
pub async fn resume<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<SequenceResponse>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.sequencer.resume().await?;
    Ok(respond(&state))
}

/// `POST /api/sequence/stop`
pub async fn stop<R, D>(
    State(state): State<AppState<R, D>>,
) -> Result<Json<SequenceResponse>, ApiError>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    state.sequencer.stop().await?;
    Ok(respond(&state))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;

    use rundown_domain::block::Block;
    use rundown_domain::command::Command;

    use crate::testing::{app, expect_json, send};

    #[tokio::test]
    async fn should_refuse_to_start_empty_sequence() {
        let (app, _, _) = app();

        let body = expect_json(
            send(&app, "POST", "/api/sequence/start", None).await,
            StatusCode::CONFLICT,
        )
        .await;

        assert_eq!(body["error"], "the rundown has no blocks to run");
    }

    #[tokio::test]
    async fn should_play_every_block_then_return_to_idle() {
        let (app, state, device) = app();
        let block = Block::builder()
            .title("Opening")
            .command(Command::builder().name("Cut").target("1").build().unwrap())
            .build()
            .unwrap();
        state.rundown_service.add_block(block, None).await.unwrap();

        let body = expect_json(
            send(&app, "POST", "/api/sequence/start", None).await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(body["status"], "running");

        for _ in 0..100 {
            let body = expect_json(send(&app, "GET", "/api/sequence", None).await, StatusCode::OK).await;
            if body["status"] == "idle" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(state.sequencer.status(), rundown_app::sequencer::SequenceStatus::Idle);
        assert_eq!(device.calls().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_controls_when_idle() {
        let (app, _, _) = app();

        for uri in ["/api/sequence/pause", "/api/sequence/resume", "/api/sequence/stop"] {
            let response = send(&app, "POST", uri, None).await;
            assert_eq!(response.status(), StatusCode::CONFLICT, "{uri}");
        }
    }
}
