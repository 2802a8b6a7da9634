//! Wiring shared by the handler tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use rundown_adapter_virtual::VirtualDevice;
use rundown_app::block_executor::BlockExecutor;
use rundown_app::dispatcher::CommandDispatcher;
use rundown_app::log_bus::InProcessLogBus;
use rundown_app::rundown_store::InMemoryRundownStore;
use rundown_app::sequencer::Sequencer;
use rundown_app::services::rundown_service::RundownService;
use rundown_app::show_timer::ShowTimer;

use crate::state::AppState;

pub(crate) type TestState = AppState<Arc<InMemoryRundownStore>, Arc<VirtualDevice>>;

pub(crate) fn test_state() -> (TestState, Arc<VirtualDevice>) {
    let store = Arc::new(InMemoryRundownStore::default());
    let device = Arc::new(VirtualDevice::new());
    let log_bus = Arc::new(InProcessLogBus::new(64));
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&device),
        Arc::clone(&log_bus),
    ));
    let show = ShowTimer::spawn(Arc::clone(&store), Arc::clone(&dispatcher));
    let sequencer = Arc::new(Sequencer::new(BlockExecutor::new(Arc::clone(&dispatcher))));
    let state = AppState::from_arcs(
        Arc::new(RundownService::new(store)),
        show,
        sequencer,
        dispatcher,
        log_bus,
    );
    (state, device)
}

pub(crate) fn app() -> (Router, TestState, Arc<VirtualDevice>) {
    let (state, device) = test_state();
    (crate::router::build(state.clone()), state, device)
}

pub(crate) async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub(crate) async fn json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub(crate) async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    json(response).await
}
