use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use gazette_runtime::{Settings, default_snapshot_path, default_socket_path};

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub settings: Settings,
    // Unix domain socket path
    pub socket_path: PathBuf,
    // Last good document set, served when the metadata source fails
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Parser)]
#[command(name = "gazette-daemon", about = "Gazette search daemon")]
pub struct Cli {
    /// Metadata JSON file or directory (overrides GAZETTE_METADATA_PATH)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// URL serving the metadata JSON (overrides GAZETTE_METADATA_URL)
    #[arg(long)]
    pub metadata_url: Option<String>,

    /// Path to Unix domain socket (optional override)
    #[arg(long)]
    pub socket_path: Option<PathBuf>,

    /// Path to the snapshot cache file (optional override)
    #[arg(long)]
    pub snapshot_path: Option<PathBuf>,

    /// Reload the metadata every N seconds (overrides GAZETTE_REFRESH_SECS)
    #[arg(long)]
    pub refresh_secs: Option<u64>,
}

impl DaemonConfig {
    pub fn from_args(args: &Cli, mut settings: Settings) -> Result<Self> {
        if let Some(path) = &args.metadata {
            settings.metadata_path = Some(path.clone());
        }
        if let Some(url) = &args.metadata_url {
            settings.metadata_url = Some(url.clone());
        }
        if let Some(secs) = args.refresh_secs {
            settings.refresh_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(Self {
            settings,
            socket_path: args.socket_path.clone().unwrap_or_else(default_socket_path),
            snapshot_path: args.snapshot_path.clone().unwrap_or_else(default_snapshot_path),
        })
    }

    pub fn from_env() -> Result<Self> {
        let args = Cli::parse();
        Self::from_args(&args, Settings::from_env())
    }
}
