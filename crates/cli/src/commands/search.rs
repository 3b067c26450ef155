use std::io::{Stderr, Stdout};
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use gazette_engine::{CancelToken, Pagination, SearchResult};
use gazette_protocol::{DaemonRequest, DaemonResponse, QueryMetrics, SearchRequest};
use gazette_runtime::DEFAULT_PAGE_SIZE;

use crate::commands::{BackendOptions, CommandResult, daemon_request};
use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, QueryPrintContext, QueryPrinter,
    QueryRow,
};

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output results as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress timing statistics
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    /// Create a printer based on the output options.
    pub fn make_printer(&self) -> Box<dyn QueryPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let color = match self.color.as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        };

        let cfg = PrinterConfig {
            format,
            color,
            show_timing: !self.quiet,
        };

        match format {
            OutputFormat::Human => Box::new(HumanPrinter::<Stdout, Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<Stdout, Stderr>::stdout(cfg)),
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free text mixed with key:value filters (date, type, id, source, status, available)
    pub query: String,

    /// Page to show, starting at 1
    #[arg(long, short = 'p', default_value = "1")]
    pub page: usize,

    /// Documents per page
    #[arg(long, short = 'n', default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: usize,

    /// Output formatting options
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub backend: BackendOptions,
}

pub fn run(args: SearchArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &SearchArgs) -> CommandResult<ExitCode> {
    Pagination::validate(args.page, args.limit)?;

    let (result, metrics) = if args.backend.daemon {
        search_via_daemon(args)?
    } else {
        search_local(args)?
    };

    print_result(args, &result, metrics.as_ref())?;
    Ok(ExitCode::SUCCESS)
}

fn search_local(args: &SearchArgs) -> CommandResult<(SearchResult, Option<QueryMetrics>)> {
    let engine = args.backend.local_engine()?;
    let (result, metrics) = engine.search_timed(&args.query, args.page, args.limit, &CancelToken::new())?;
    Ok((result, metrics.as_ref().map(QueryMetrics::from)))
}

/// Daemon mode: send the query over Unix socket.
fn search_via_daemon(args: &SearchArgs) -> CommandResult<(SearchResult, Option<QueryMetrics>)> {
    let mut req = SearchRequest::new(args.query.clone(), args.page, args.limit);
    req.timed = !args.output.quiet;

    match daemon_request(&args.backend.socket_path(), &DaemonRequest::Search(req))? {
        DaemonResponse::SearchResult(resp) => Ok((resp.result, resp.metrics)),
        other => Err(anyhow!("unexpected daemon response: {other:?}").into()),
    }
}

fn print_result(args: &SearchArgs, result: &SearchResult, metrics: Option<&QueryMetrics>) -> CommandResult<()> {
    let mut printer = args.output.make_printer();

    let ctx = QueryPrintContext {
        kind: "search",
        pagination: &result.pagination,
        query_info: &result.query_info,
        metrics,
    };

    printer.begin(&ctx)?;

    let first_rank = result.pagination.start_index.max(1);
    for (i, document) in result.documents.iter().enumerate() {
        let row = QueryRow {
            rank: first_rank + i,
            document,
        };
        printer.print_row(&row, &ctx)?;
    }

    printer.finish(&ctx)?;
    Ok(())
}
