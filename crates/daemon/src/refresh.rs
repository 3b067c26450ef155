use std::{sync::Arc, thread, time::Duration};

use crossbeam::{channel, select};
use gazette_engine::RefreshOutcome;
use log::{debug, info};

use crate::state::DaemonState;

/// How often the refresh loop checks for shutdown between reloads.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Reload the snapshot every `interval` until the daemon shuts down.
pub fn spawn_refresh_loop(state: Arc<DaemonState>, interval: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let ticker = channel::tick(interval);
        let poll = channel::tick(SHUTDOWN_POLL);
        info!("periodic refresh every {}s", interval.as_secs());

        loop {
            select! {
                recv(ticker) -> _ => {
                    if let RefreshOutcome::Replaced { documents, .. } = state.refresh() {
                        debug!("periodic refresh loaded {documents} documents");
                    }
                }
                recv(poll) -> _ => {
                    if state.is_shutting_down() {
                        debug!("refresh loop stopping");
                        return;
                    }
                }
            }
        }
    })
}
