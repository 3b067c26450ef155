use std::sync::{Arc, atomic::Ordering};

mod config;
mod handler;
mod refresh;
mod rpc;
mod state;

use config::DaemonConfig;
use gazette_runtime::logging;
use state::DaemonState;

use log::{info, warn};

fn main() -> anyhow::Result<()> {
    logging::init().ok();

    let config = DaemonConfig::from_env()?;

    info!(
        "Starting gazette daemon: metadata={}, url={}, snapshot={}, socket={}",
        config
            .settings
            .metadata_path
            .as_ref()
            .map_or_else(|| "<none>".to_owned(), |p| p.display().to_string()),
        config.settings.metadata_url.as_deref().unwrap_or("<none>"),
        config.snapshot_path.display(),
        config.socket_path.display(),
    );

    let state = Arc::new(DaemonState::new(config));

    let refresher = state
        .config
        .settings
        .refresh_interval
        .map(|interval| refresh::spawn_refresh_loop(Arc::clone(&state), interval));

    let served = rpc::run_rpc_server(Arc::clone(&state));
    // Stop the refresh loop even when the server failed to start.
    state.shutdown_flag().store(true, Ordering::Relaxed);

    if let Some(handle) = refresher {
        if handle.join().is_err() {
            warn!("refresh thread panicked");
        }
    }
    served
}
