pub mod filters;
pub mod refresh;
pub mod search;
pub mod stats;

use std::{
    os::unix::net::UnixStream,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use gazette_engine::{Engine, EngineConfig, RefreshOutcome};
use gazette_protocol::{
    DaemonRequest, DaemonResponse,
    codec::{read_message, write_message},
};
use gazette_runtime::{Settings, default_socket_path};
use gazette_source::source_from_settings;
use log::warn;

pub use filters::FiltersArgs;
pub use refresh::RefreshArgs;
pub use search::SearchArgs;
pub use stats::StatsArgs;

/// Common error type for command handlers
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the gazette corpus.
    ///
    /// Example:
    ///   gazette search 'date:2015 type:legal land'
    ///   gazette search --page 2 --limit 20 'available:yes notice'
    Search(SearchArgs),

    /// Show corpus-wide totals, document types and years covered.
    Stats(StatsArgs),

    /// Show distinct months, days and types of one partition.
    ///
    /// Example:
    ///   gazette filters gazettes_2015
    Filters(FiltersArgs),

    /// Ask the daemon to reload its metadata.
    Refresh(RefreshArgs),
}

/// Where requests are answered: in-process, or by the daemon.
#[derive(Debug, Args)]
pub struct BackendOptions {
    /// Use the background daemon instead of loading metadata in-process
    #[arg(long)]
    pub daemon: bool,

    /// Metadata JSON file or directory (overrides GAZETTE_METADATA_PATH)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// URL serving the metadata JSON (overrides GAZETTE_METADATA_URL)
    #[arg(long)]
    pub metadata_url: Option<String>,

    /// Daemon socket (defaults to the cache directory)
    #[arg(long)]
    pub socket_path: Option<PathBuf>,
}

impl BackendOptions {
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(default_socket_path)
    }

    /// Engine loaded from the configured metadata source.
    pub fn local_engine(&self) -> Result<Engine> {
        let mut settings = Settings::from_env();
        if let Some(path) = &self.metadata {
            settings.metadata_path = Some(path.clone());
        }
        if let Some(url) = &self.metadata_url {
            settings.metadata_url = Some(url.clone());
        }

        let engine = Engine::new(EngineConfig::from(&settings));
        let source = source_from_settings(&settings, None);
        match engine.refresh(source.as_ref()) {
            RefreshOutcome::Replaced { .. } => {}
            RefreshOutcome::KeptPrevious { error } | RefreshOutcome::NoSnapshot { error } => {
                warn!("metadata unavailable, searching an empty dataset: {error}");
            }
        }
        Ok(engine)
    }
}

/// Send one request to the daemon and wait for its answer.
pub fn daemon_request(socket_path: &Path, request: &DaemonRequest) -> Result<DaemonResponse> {
    let mut stream = UnixStream::connect(socket_path).with_context(|| {
        format!(
            "failed to connect to gazette daemon at {}",
            socket_path.display()
        )
    })?;

    write_message(&mut stream, request)?;
    match read_message(&mut stream)? {
        DaemonResponse::Error(msg) => Err(anyhow!("daemon error: {msg}")),
        resp => Ok(resp),
    }
}
