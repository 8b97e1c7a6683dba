//! Search command flow: probe, fetch, filter, then export or display.

use undertow_core::aggregator::finish;
use undertow_core::{Aggregator, FetchMode, FilterBounds, UndertowConfig};

use crate::progress::ConsoleProgress;
use crate::{Cli, browse, export, render};

fn fetch_mode(cli: &Cli) -> FetchMode {
    if cli.parallel {
        FetchMode::Concurrent
    } else if cli.latest {
        FetchMode::LatestOnly
    } else {
        FetchMode::Sequential
    }
}

fn filter_bounds(cli: &Cli) -> FilterBounds {
    let mut bounds = FilterBounds {
        min_seeds: cli.min_seeds,
        max_seeds: cli.max_seeds,
        limit: cli
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX)),
        ..Default::default()
    };
    if let Some(size) = &cli.min_size {
        bounds = bounds.with_min_size_text(size);
    }
    if let Some(size) = &cli.max_size {
        bounds = bounds.with_max_size_text(size);
    }
    bounds
}

/// Runs one search or latest-uploads session.
///
/// # Errors
///
/// - `AggregateError::InvalidQuery` - Page budget out of range or missing term
/// - `AggregateError::NoMatchingProviders` - `--sites` matched nothing
/// - `AggregateError::TotalUnavailability` - No site answered on any mirror
/// - Export file could not be written
pub(crate) async fn run(cli: Cli) -> anyhow::Result<()> {
    if !cli.quiet {
        render::banner();
    }

    let mode = fetch_mode(&cli);
    let aggregator = Aggregator::new(
        UndertowConfig::from_env(),
        undertow_search::default_registry(),
    )?;
    let query = aggregator.query(cli.query.clone().unwrap_or_default(), cli.pages, mode)?;
    let bounds = filter_bounds(&cli);
    let selected = aggregator.select(&cli.sites)?;

    let working = aggregator.resolve_mirrors(&selected).await;
    if !cli.quiet {
        render::probe_report(&working.probes);
        if !working.is_empty() {
            render::working_count(working.available());
        }
        let term = (mode != FetchMode::LatestOnly).then(|| query.term());
        render::search_heading(term);
    }

    let progress = ConsoleProgress::new(cli.progress, cli.verbose, mode);
    let outcomes = aggregator.fetch(&working, &query, &progress).await?;
    let report = finish(&working, outcomes, &bounds);

    tracing::info!(
        results = report.results.len(),
        available = report.available_providers,
        total = report.total_providers,
        "search finished"
    );

    if report.results.is_empty() {
        render::no_results();
        return Ok(());
    }

    if let Some(path) = &cli.export_csv {
        export::export_csv(path, &report.results)?;
        render::exported(path);
    }
    if let Some(path) = &cli.export_json {
        export::export_json(path, &report.results)?;
        render::exported(path);
    }

    if cli.magnets_only {
        let magnets: Vec<&str> = report
            .results
            .iter()
            .filter_map(|result| result.raw.magnet.as_deref())
            .filter(|magnet| !magnet.is_empty())
            .collect();
        for magnet in &magnets {
            println!("{magnet}");
        }
        println!();
        println!("Total magnet links: {}", magnets.len());
        return Ok(());
    }

    if !cli.quiet {
        render::results_heading();
    }
    println!("{}", render::render_table(&report.rows));
    render::total(report.results.len());

    if cli.quiet {
        return Ok(());
    }

    browse::browse(&report.results).await?;
    println!("\nThank you for using Undertow!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_mode_selection() {
        let cli = Cli::try_parse_from(["undertow", "x"]).unwrap();
        assert_eq!(fetch_mode(&cli), FetchMode::Sequential);

        let cli = Cli::try_parse_from(["undertow", "x", "--parallel"]).unwrap();
        assert_eq!(fetch_mode(&cli), FetchMode::Concurrent);

        let cli = Cli::try_parse_from(["undertow", "--latest"]).unwrap();
        assert_eq!(fetch_mode(&cli), FetchMode::LatestOnly);
    }

    #[test]
    fn test_filter_bounds_from_flags() {
        let cli = Cli::try_parse_from([
            "undertow",
            "x",
            "--min-size",
            "500MB",
            "--max-seeds",
            "40",
            "--limit",
            "5",
        ])
        .unwrap();

        let bounds = filter_bounds(&cli);
        assert_eq!(bounds.min_size, Some(500.0 * 1024.0 * 1024.0));
        assert_eq!(bounds.max_size, None);
        assert_eq!(bounds.max_seeds, Some(40));
        assert_eq!(bounds.limit, Some(5));
    }
}
