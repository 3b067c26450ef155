use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use gazette_protocol::{DaemonRequest, DaemonResponse};

use crate::commands::{BackendOptions, CommandResult, daemon_request, search::OutputOptions};

#[derive(Debug, Args)]
pub struct FiltersArgs {
    /// Partition name, e.g. gazettes_2015 (global_metadata with a single partition)
    pub partition: String,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub backend: BackendOptions,
}

pub fn run(args: FiltersArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[filters] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &FiltersArgs) -> CommandResult<ExitCode> {
    let options = if args.backend.daemon {
        let req = DaemonRequest::FilterOptions(args.partition.clone());
        match daemon_request(&args.backend.socket_path(), &req)? {
            DaemonResponse::FilterOptions(options) => options,
            other => return Err(anyhow!("unexpected daemon response: {other:?}").into()),
        }
    } else {
        args.backend.local_engine()?.filter_options(&args.partition)?
    };

    args.output
        .make_printer()
        .print_filter_options(&args.partition, &options)?;
    Ok(ExitCode::SUCCESS)
}
