//! Undertow CLI - Command-line interface
//!
//! Searches many torrent indexes at once and prints one merged table.

mod browse;
mod commands;
mod export;
mod progress;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use undertow_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "undertow", version)]
#[command(about = "Search many torrent sites at once")]
pub(crate) struct Cli {
    /// Search query
    #[arg(value_name = "QUERY", required_unless_present = "latest")]
    pub query: Option<String>,

    /// Number of pages to search per site (1-10)
    #[arg(short, long, default_value_t = 1, value_name = "N")]
    pub pages: u32,

    /// Maximum number of results to display
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Comma-separated list of sites to search (e.g. "1337x,The Pirate Bay,Nyaa")
    #[arg(long, value_delimiter = ',')]
    pub sites: Vec<String>,

    /// Minimum torrent size (e.g. 500MB)
    #[arg(long, value_name = "SIZE")]
    pub min_size: Option<String>,

    /// Maximum torrent size (e.g. 2GB)
    #[arg(long, value_name = "SIZE")]
    pub max_size: Option<String>,

    /// Minimum number of seeds
    #[arg(long, value_name = "N")]
    pub min_seeds: Option<u64>,

    /// Maximum number of seeds
    #[arg(long, value_name = "N")]
    pub max_seeds: Option<u64>,

    /// Export results to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Export results to a JSON file
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Print only magnet links
    #[arg(long)]
    pub magnets_only: bool,

    /// Suppress the banner, extra messages and the interactive prompt
    #[arg(long)]
    pub quiet: bool,

    /// Search all sites concurrently
    #[arg(long, conflicts_with = "latest")]
    pub parallel: bool,

    /// Show the latest uploads instead of searching
    #[arg(long)]
    pub latest: bool,

    /// Show a spinner per site while fetching
    #[arg(long)]
    pub progress: bool,

    /// Show detailed fetching messages
    #[arg(long)]
    pub verbose: bool,

    /// Console log level (overrides --verbose)
    #[arg(long, value_enum)]
    pub log_level: Option<CliLogLevel>,

    /// Directory for the per-run debug log
    #[arg(long, value_name = "DIR")]
    pub logs_dir: Option<PathBuf>,
}

impl Cli {
    fn console_level(&self) -> CliLogLevel {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level,
            (None, true) => CliLogLevel::Info,
            (None, false) => CliLogLevel::Warn,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(
        cli.console_level().as_tracing_level(),
        cli.logs_dir.as_deref(),
    ) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_flags() {
        let cli = Cli::try_parse_from([
            "undertow",
            "ubuntu",
            "-p",
            "3",
            "--sites",
            "1337x, Nyaa",
            "--min-seeds",
            "10",
            "--parallel",
        ])
        .unwrap();

        assert_eq!(cli.query.as_deref(), Some("ubuntu"));
        assert_eq!(cli.pages, 3);
        assert_eq!(cli.sites, vec!["1337x", " Nyaa"]);
        assert_eq!(cli.min_seeds, Some(10));
        assert!(cli.parallel);
        assert_eq!(cli.console_level(), CliLogLevel::Warn);
    }

    #[test]
    fn test_query_optional_only_for_latest() {
        assert!(Cli::try_parse_from(["undertow"]).is_err());
        assert!(Cli::try_parse_from(["undertow", "--latest"]).is_ok());
    }

    #[test]
    fn test_parallel_conflicts_with_latest() {
        assert!(Cli::try_parse_from(["undertow", "x", "--parallel", "--latest"]).is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(Cli::try_parse_from(["undertow", "x", "--limit", "0"]).is_err());
    }

    #[test]
    fn test_verbose_and_log_level() {
        let cli = Cli::try_parse_from(["undertow", "x", "--verbose"]).unwrap();
        assert_eq!(cli.console_level(), CliLogLevel::Info);

        let cli =
            Cli::try_parse_from(["undertow", "x", "--verbose", "--log-level", "error"]).unwrap();
        assert_eq!(cli.console_level(), CliLogLevel::Error);
    }
}
