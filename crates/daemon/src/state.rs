use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use gazette_engine::{CancelToken, DocumentSource, Engine, EngineConfig, RefreshOutcome};
use gazette_source::source_from_settings;

use crate::config::DaemonConfig;

pub struct DaemonState {
    pub config: DaemonConfig,
    pub engine: Engine,
    source: Box<dyn DocumentSource>,
    shutdown: Arc<AtomicBool>,
}

impl DaemonState {
    /// Build the engine and load the first snapshot. A failed first load
    /// leaves the daemon serving an empty dataset.
    pub fn new(config: DaemonConfig) -> Self {
        let source = source_from_settings(&config.settings, Some(&config.snapshot_path));
        Self::with_source(config, source)
    }

    pub fn with_source(config: DaemonConfig, source: Box<dyn DocumentSource>) -> Self {
        let engine = Engine::new(EngineConfig::from(&config.settings));
        let state = Self {
            config,
            engine,
            source,
            shutdown: Arc::new(AtomicBool::new(false)),
        };
        state.refresh();
        state
    }

    pub fn refresh(&self) -> RefreshOutcome {
        self.engine.refresh(self.source.as_ref())
    }

    /// Flag set by SIGINT/SIGTERM.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Token that fires when the daemon starts shutting down.
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken::from_flag(self.shutdown_flag())
    }
}
