//! End-to-end smoke tests for the full rundownd stack.
//!
//! Each test wires the complete application (virtual device, log bus,
//! in-memory rundown store, real engines, real axum router) and exercises
//! the HTTP layer via `tower::ServiceExt::oneshot`. No TCP port is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rundown_adapter_http_axum::router;
use rundown_adapter_http_axum::state::AppState;
use rundown_adapter_virtual::VirtualDevice;
use rundown_app::block_executor::BlockExecutor;
use rundown_app::dispatcher::CommandDispatcher;
use rundown_app::log_bus::InProcessLogBus;
use rundown_app::rundown_store::InMemoryRundownStore;
use rundown_app::sequencer::Sequencer;
use rundown_app::services::rundown_service::RundownService;
use rundown_app::show_timer::ShowTimer;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Build a fully-wired router backed by a virtual device.
fn app() -> (axum::Router, Arc<VirtualDevice>) {
    let device = Arc::new(VirtualDevice::new());
    let log_bus = Arc::new(InProcessLogBus::new(256));
    let store = Arc::new(InMemoryRundownStore::default());

    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&device),
        Arc::clone(&log_bus),
    ));
    let sequencer = Arc::new(
        Sequencer::new(BlockExecutor::new(Arc::clone(&dispatcher)))
            .with_gap(Duration::from_millis(10)),
    );
    let show = ShowTimer::spawn(Arc::clone(&store), Arc::clone(&dispatcher));

    let state = AppState::from_arcs(
        Arc::new(RundownService::new(store)),
        show,
        sequencer,
        dispatcher,
        log_bus,
    );
    (router::build(state), device)
}

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn wait_for_calls(device: &VirtualDevice, count: usize) {
    for _ in 0..200 {
        if device.calls().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("device received {} calls, expected {count}", device.calls().len());
}

async fn seed(app: &axum::Router) {
    let (status, _) = call(
        app,
        "POST",
        "/api/blocks",
        Some(json!({
            "title": "Opening",
            "duration": "00:30",
            "commands": [
                { "name": "Cut", "target": "1" },
                { "name": "OverlayInput1In", "target": "Lower third" },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, container) =
        call(app, "POST", "/api/containers", Some(json!({ "title": "Segment" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        app,
        "POST",
        "/api/blocks",
        Some(json!({
            "title": "Interview",
            "duration": "01:15",
            "container_id": container["id"],
            "commands": [{ "name": "SetVolume", "target": "2", "value": "80" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (app, _) = app();

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Rundown editing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_summarize_flattened_rundown() {
    let (app, _) = app();
    seed(&app).await;

    let (status, summary) = call(&app, "GET", "/api/rundown/summary", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["block_count"], 2);
    assert_eq!(summary["total_duration"], "01:45");
    assert_eq!(summary["computed_end_time"], "20:01:45");
    assert_eq!(summary["blocks"][1]["title"], "Interview");
}

// ---------------------------------------------------------------------------
// Show timer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_fire_block_commands_when_show_starts() {
    let (app, device) = app();
    seed(&app).await;

    let (status, show) = call(&app, "POST", "/api/show/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(show["status"], "running");
    assert_eq!(show["on_air"]["title"], "Opening");

    wait_for_calls(&device, 2).await;
    let mut functions: Vec<String> = device.calls().into_iter().map(|c| c.function).collect();
    functions.sort();
    assert_eq!(functions, ["Cut", "OverlayInput1In"]);

    let (_, show) = call(&app, "POST", "/api/show/next", None).await;
    assert_eq!(show["on_air"]["title"], "Interview");
    wait_for_calls(&device, 3).await;
    let volume = device.calls().into_iter().find(|c| c.function == "SetVolume").unwrap();
    assert_eq!(volume.input.as_deref(), Some("2"));
    assert_eq!(volume.value.as_deref(), Some("80"));

    let (_, show) = call(&app, "POST", "/api/show/next", None).await;
    assert_eq!(show["status"], "completed");

    let (_, logs) = call(&app, "GET", "/api/logs", None).await;
    let messages: Vec<&str> = logs
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["message"].as_str())
        .collect();
    assert!(messages.contains(&"Show started with 2 blocks"));
    assert!(messages.contains(&"Show completed"));
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_sequence_in_rundown_order() {
    let (app, device) = app();
    seed(&app).await;

    let (status, body) = call(&app, "POST", "/api/sequence/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    wait_for_calls(&device, 3).await;
    let functions: Vec<String> = device.calls().into_iter().map(|c| c.function).collect();
    assert_eq!(functions, ["Cut", "OverlayInput1In", "SetVolume"]);
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_device_status() {
    let (app, _) = app();

    let (status, body) = call(&app, "GET", "/api/device/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
}
