//! Per-provider progress on the console.

use std::time::Duration;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use undertow_core::{FetchMode, ProgressObserver, ProviderOutcome, StopReason};

/// Renders fetch progress as spinners (`--progress`) or log lines (`--verbose`).
///
/// At most one spinner is alive at a time. It is stopped, with its ticker
/// thread joined, before the provider's status line is printed.
pub(crate) struct ConsoleProgress {
    spinner: bool,
    verbose: bool,
    /// "Searching" or "Fetching", depending on the fetch mode
    verb: &'static str,
    active: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub(crate) fn new(spinner: bool, verbose: bool, mode: FetchMode) -> Self {
        let verb = match mode {
            FetchMode::LatestOnly => "Fetching",
            FetchMode::Sequential | FetchMode::Concurrent => "Searching",
        };
        Self {
            spinner,
            verbose,
            verb,
            active: Mutex::new(None),
        }
    }

    fn start_spinner(&self, provider: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("|/-\\ ")
            .template("{msg} {spinner:.cyan}")
        {
            bar.set_style(style);
        }
        bar.set_message(format!("{} {provider}", self.verb));
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

/// Status glyph colored by outcome.
pub(crate) fn colored_glyph(outcome: &ProviderOutcome) -> ColoredString {
    let glyph = outcome.status_glyph();
    match &outcome.stop {
        StopReason::Aborted {
            error: undertow_core::FetchError::MalformedUrl { .. },
            ..
        } => glyph.magenta(),
        StopReason::Refused { .. } | StopReason::Aborted { .. } => glyph.red(),
        _ if outcome.results.is_empty() => glyph.magenta(),
        _ => glyph.green(),
    }
}

impl ProgressObserver for ConsoleProgress {
    fn provider_started(&self, provider: &str) {
        if self.spinner {
            *self.active.lock() = Some(self.start_spinner(provider));
        } else if self.verbose {
            println!("{}", format!("\n{} {provider}...", self.verb).yellow());
        }
    }

    fn page_fetched(&self, provider: &str, page: u32, count: usize) {
        if !self.verbose || self.spinner {
            return;
        }
        if count > 0 {
            println!(
                "{}",
                format!("Found {count} results from {provider} (page {})", page + 1).green()
            );
        } else {
            println!(
                "{}",
                format!("No results found from {provider} (page {})", page + 1).magenta()
            );
        }
    }

    fn provider_finished(&self, outcome: &ProviderOutcome) {
        let glyph = colored_glyph(outcome);

        if let Some(bar) = self.active.lock().take() {
            bar.disable_steady_tick();
            bar.finish_with_message(format!("{} {glyph}", outcome.provider));
            return;
        }

        if self.spinner || self.verbose {
            println!("{} {glyph}", outcome.provider);
        }
    }
}

#[cfg(test)]
mod tests {
    use undertow_core::{FetchError, RawResult};

    use super::*;

    fn outcome(results: usize, stop: StopReason) -> ProviderOutcome {
        ProviderOutcome {
            provider: "Nyaa".to_string(),
            results: (0..results).map(|i| RawResult::new("Nyaa", format!("{i}"))).collect(),
            pages_fetched: 1,
            stop,
        }
    }

    #[test]
    fn test_glyph_text_is_unchanged_by_color() {
        colored::control::set_override(false);

        let refused = outcome(0, StopReason::Refused { page: 0, status: 404 });
        assert_eq!(colored_glyph(&refused).to_string(), "✗ 404");

        let skipped = outcome(
            0,
            StopReason::Aborted {
                page: 0,
                error: FetchError::MalformedUrl { url: None },
            },
        );
        assert_eq!(colored_glyph(&skipped).to_string(), "✗ Skipped");

        let found = outcome(2, StopReason::BudgetExhausted);
        assert_eq!(colored_glyph(&found).to_string(), "✓ 2 results");
    }

    #[test]
    fn test_spinner_is_cleared_on_finish() {
        let progress = ConsoleProgress::new(true, false, FetchMode::Sequential);
        progress.provider_started("Nyaa");
        assert_eq!(
            progress.active.lock().as_ref().map(ProgressBar::message).as_deref(),
            Some("Searching Nyaa")
        );

        progress.provider_finished(&outcome(0, StopReason::EmptyPage { page: 0 }));
        assert!(progress.active.lock().is_none());
    }

    #[test]
    fn test_latest_mode_spinner_says_fetching() {
        let progress = ConsoleProgress::new(true, false, FetchMode::LatestOnly);
        progress.provider_started("EZTV");
        assert_eq!(
            progress.active.lock().as_ref().map(ProgressBar::message).as_deref(),
            Some("Fetching EZTV")
        );

        progress.provider_finished(&outcome(1, StopReason::BudgetExhausted));
        assert!(progress.active.lock().is_none());
    }
}
