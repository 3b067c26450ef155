use std::{path::PathBuf, process::ExitCode};

use anyhow::{Result, anyhow};
use clap::Args;
use gazette_protocol::{DaemonRequest, DaemonResponse, RefreshReport};
use gazette_runtime::default_socket_path;

use crate::commands::daemon_request;

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Daemon socket (defaults to the cache directory)
    #[arg(long)]
    pub socket_path: Option<PathBuf>,
}

pub fn run(args: RefreshArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[refresh] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &RefreshArgs) -> Result<ExitCode> {
    let socket_path = args.socket_path.clone().unwrap_or_else(default_socket_path);

    let report = match daemon_request(&socket_path, &DaemonRequest::Refresh)? {
        DaemonResponse::Refreshed(report) => report,
        other => return Err(anyhow!("unexpected daemon response: {other:?}")),
    };

    match report {
        RefreshReport::Replaced { documents, partitions } => {
            eprintln!("[refresh] loaded {documents} documents into {partitions} partitions");
            Ok(ExitCode::SUCCESS)
        }
        RefreshReport::KeptPrevious(reason) => {
            eprintln!("[refresh] source failed, still serving previous data: {reason}");
            Ok(ExitCode::from(1))
        }
        RefreshReport::NoSnapshot(reason) => {
            eprintln!("[refresh] source failed and no data is loaded: {reason}");
            Ok(ExitCode::from(1))
        }
    }
}
