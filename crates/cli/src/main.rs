use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use gazette_runtime::logging;

#[derive(Debug, Parser)]
#[command(name = "gazette", version, about = "Search archived gazette metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => commands::search::run(args),
        Command::Stats(args) => commands::stats::run(args),
        Command::Filters(args) => commands::filters::run(args),
        Command::Refresh(args) => commands::refresh::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_paging() {
        let cli = Cli::parse_from(["gazette", "search", "date:2015 land", "--page", "2", "-n", "5", "--json"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "date:2015 land");
        assert_eq!((args.page, args.limit), (2, 5));
        assert!(args.output.json);
        assert!(!args.backend.daemon);
        assert_eq!(args.backend.metadata_url, None);
    }

    #[test]
    fn stats_accepts_metadata_url() {
        let cli = Cli::parse_from(["gazette", "stats", "--metadata-url", "http://localhost:8000/meta.json"]);
        let Command::Stats(args) = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(args.backend.metadata_url.as_deref(), Some("http://localhost:8000/meta.json"));
    }

    #[test]
    fn search_defaults() {
        let cli = Cli::parse_from(["gazette", "search", "notice"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!((args.page, args.limit), (1, gazette_runtime::DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn filters_requires_partition() {
        assert!(Cli::try_parse_from(["gazette", "filters"]).is_err());
        let cli = Cli::parse_from(["gazette", "filters", "gazettes_2015", "--daemon"]);
        assert!(matches!(cli.command, Command::Filters(ref a) if a.partition == "gazettes_2015" && a.backend.daemon));
    }
}
