//! # rundownd: rundown show-control daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize `tracing` with an `EnvFilter`
//! - Construct the device adapter (vMix or virtual)
//! - Construct the log bus, the in-memory rundown store and the engines
//!   (dispatcher, block executor, sequencer, show timer)
//! - Build the axum router, injecting services and engine handles
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rundown_adapter_http_axum::state::AppState;
use rundown_adapter_virtual::VirtualDevice;
use rundown_adapter_vmix::VmixClient;
use rundown_app::block_executor::BlockExecutor;
use rundown_app::dispatcher::CommandDispatcher;
use rundown_app::log_bus::InProcessLogBus;
use rundown_app::ports::DeviceControl;
use rundown_app::rundown_store::InMemoryRundownStore;
use rundown_app::sequencer::Sequencer;
use rundown_app::services::rundown_service::RundownService;
use rundown_app::show_timer::ShowTimer;

use crate::config::{Config, DeviceKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match config.device.kind {
        DeviceKind::Vmix => {
            let client = VmixClient::new(&config.device.vmix).context("building vMix client")?;
            tracing::info!(url = %config.device.vmix.api_url(), "using vMix device");
            serve(&config, client).await
        }
        DeviceKind::Virtual => {
            tracing::info!("using virtual device");
            serve(&config, VirtualDevice::new()).await
        }
    }
}

async fn serve<D>(config: &Config, device: D) -> anyhow::Result<()>
where
    D: DeviceControl + 'static,
{
    // Operator log
    let log_bus = Arc::new(InProcessLogBus::new(config.log_sink.capacity));

    // Rundown
    let store = Arc::new(InMemoryRundownStore::default());
    let rundown_service = Arc::new(RundownService::new(Arc::clone(&store)));

    // Engines
    let dispatcher = Arc::new(
        CommandDispatcher::new(device, Arc::clone(&log_bus))
            .with_timeout(config.device.vmix.timeout()),
    );
    let sequencer = Arc::new(
        Sequencer::new(BlockExecutor::new(Arc::clone(&dispatcher)))
            .with_gap(config.inter_block_gap()),
    );
    let show = ShowTimer::spawn(store, Arc::clone(&dispatcher));

    match dispatcher.device().test_connection().await {
        Ok(true) => tracing::info!("device reachable"),
        Ok(false) => tracing::warn!("device answered but does not look like vMix"),
        Err(err) => tracing::warn!(error = %err, "device unreachable, commands will fail until it is up"),
    }

    // HTTP
    let state = AppState::from_arcs(rundown_service, show, sequencer, dispatcher, log_bus);
    let app = rundown_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!("rundownd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("rundownd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
