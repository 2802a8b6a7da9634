//! Operator log: history and live Server-Sent Events stream.

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use rundown_app::ports::{DeviceControl, RundownRepository};
use rundown_domain::log::LogEntry;

use crate::state::AppState;

/// `GET /api/logs`: every entry so far, oldest first.
pub async fn list<R, D>(State(state): State<AppState<R, D>>) -> Json<Vec<LogEntry>>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    Json(state.log_bus.history())
}

/// `GET /api/logs/stream`: SSE stream of new log entries.
///
/// Each entry is sent as a JSON `data:` frame. The stream continues until the
/// client disconnects.
pub async fn stream<R, D>(
    State(state): State<AppState<R, D>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>
where
    R: RundownRepository + 'static,
    D: DeviceControl + 'static,
{
    let receiver = state.log_bus.subscribe();
    let entries = BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(entry) => match serde_json::to_string(&entry) {
            Ok(json) => Some(Ok(Event::default().event("log").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize log entry for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, some log entries were dropped");
            None
        }
    });

    Sse::new(entries).keep_alive(KeepAlive::default())
}
