//! Console output: banner, probe report, results table and messages.

use colored::Colorize;
use undertow_core::normalize::DisplayRow;
use undertow_core::{AggregateError, ProbeStatus};
use unicode_width::UnicodeWidthStr;

const BANNER: &str = r"
  _   _           _               _
 | | | |_ __   __| | ___ _ __ ___| |_ _____      __
 | | | | '_ \ / _` |/ _ \ '__/ __| __/ _ \ \ /\ / /
 | |_| | | | | (_| |  __/ |  \__ \ || (_) \ V  V /
  \___/|_| |_|\__,_|\___|_|  |___/\__\___/ \_/\_/
";

const HEADERS: [&str; 7] = ["#", "Site", "Name", "Size", "Seeds", "Leeches", "Date"];

pub(crate) fn banner() {
    println!("{}", BANNER.cyan().bold());
    println!("{}", format!("v{}", env!("CARGO_PKG_VERSION")).cyan());
}

pub(crate) fn probe_report(probes: &[ProbeStatus]) {
    println!("{}", "Testing torrent sites...".cyan());
    for probe in probes {
        let status = if probe.is_working() {
            "✓ Working".green()
        } else {
            "✗ Not accessible".red()
        };
        println!("Testing {}... {status}", probe.provider);
    }
}

pub(crate) fn working_count(available: usize) {
    println!("{}", format!("\nFound {available} working sites").green());
}

pub(crate) fn search_heading(term: Option<&str>) {
    let heading = match term {
        Some(term) => format!("\nSearching for: '{term}'"),
        None => "\nFetching latest torrents...".to_string(),
    };
    println!("{}", heading.yellow().bold());
}

pub(crate) fn results_heading() {
    let rule = "=".repeat(80);
    println!("{}", format!("\n{rule}").cyan());
    println!("{}", "SEARCH RESULTS".cyan().bold());
    println!("{}", rule.cyan());
}

pub(crate) fn no_results() {
    println!("{}", "No results found!".red());
}

pub(crate) fn total(count: usize) {
    println!("{}", format!("\nTotal results: {count}").green().bold());
}

pub(crate) fn exported(path: &std::path::Path) {
    println!(
        "{}",
        format!("Results exported to {}", path.display()).green()
    );
}

/// Prints a run failure, preferring the engine's user-facing wording.
pub(crate) fn print_error(error: &anyhow::Error) {
    let message = match error.downcast_ref::<AggregateError>() {
        Some(aggregate) => aggregate.user_message(),
        None => format!("Error: {error:#}"),
    };
    eprintln!("{}", message.red());
}

fn cells(row: &DisplayRow) -> [String; 7] {
    [
        row.index.to_string(),
        row.site.clone(),
        row.name.clone(),
        row.size.clone(),
        row.seeds.clone(),
        row.leeches.clone(),
        row.date.clone(),
    ]
}

fn rule(widths: &[usize], left: &str, fill: &str, joint: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| fill.repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(joint))
}

fn line(widths: &[usize], values: &[String], numeric_index: bool) -> String {
    let padded: Vec<String> = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (value, width))| {
            let pad = " ".repeat(width.saturating_sub(value.width()));
            if numeric_index && column == 0 {
                format!(" {pad}{value} ")
            } else {
                format!(" {value}{pad} ")
            }
        })
        .collect();
    format!("│{}│", padded.join("│"))
}

/// Renders display rows as a box-drawn grid with a rule between rows.
pub(crate) fn render_table(rows: &[DisplayRow]) -> String {
    let headers = HEADERS.map(str::to_string);
    let body: Vec<[String; 7]> = rows.iter().map(cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &body {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.width());
        }
    }

    let mut out = vec![
        rule(&widths, "╒", "═", "╤", "╕"),
        line(&widths, &headers, false),
        rule(&widths, "╞", "═", "╪", "╡"),
    ];
    for (i, row) in body.iter().enumerate() {
        if i > 0 {
            out.push(rule(&widths, "├", "─", "┼", "┤"));
        }
        out.push(line(&widths, row, true));
    }
    out.push(rule(&widths, "╘", "═", "╧", "╛"));
    out.join("\n")
}
