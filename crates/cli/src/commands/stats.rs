use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use gazette_protocol::{DaemonRequest, DaemonResponse};

use crate::commands::{BackendOptions, CommandResult, daemon_request, search::OutputOptions};

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub backend: BackendOptions,
}

pub fn run(args: StatsArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[stats] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &StatsArgs) -> CommandResult<ExitCode> {
    let stats = if args.backend.daemon {
        match daemon_request(&args.backend.socket_path(), &DaemonRequest::Dashboard)? {
            DaemonResponse::Dashboard(stats) => stats,
            other => return Err(anyhow!("unexpected daemon response: {other:?}").into()),
        }
    } else {
        args.backend.local_engine()?.dashboard_stats()?
    };

    args.output.make_printer().print_dashboard(&stats)?;
    Ok(ExitCode::SUCCESS)
}
