//! Device reachability.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use rundown_app::ports::{DeviceControl, RundownRepository};

use crate::state::AppState;

/// Body of `GET /api/device/status`.
#[derive(Serialize)]
pub struct DeviceStatus {
    pub connected: bool,
}

/// `GET /api/device/status`
///
/// An unreachable device is reported as disconnected rather than as an error.
pub async fn status<R, D>(State(state): State<AppState<R, D>>) -> Json<DeviceStatus>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let connected = match state.dispatcher.device().test_connection().await {
        Ok(connected) => connected,
        Err(err) => {
            tracing::warn!(error = %err, "device connection test failed");
            false
        }
    };
    Json(DeviceStatus { connected })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::testing::{app, expect_json, send};

    #[tokio::test]
    async fn should_report_connected_device() {
        let (app, _, _) = app();

        let body = expect_json(
            send(&app, "GET", "/api/device/status", None).await,
            StatusCode::OK,
        )
        .await;

        assert_eq!(body["connected"], true);
    }
}
