//! Fetch strategies: bounded page-by-page retrieval per provider.
//!
//! Sequential and latest-only runs walk providers one at a time and stop a
//! provider on the first empty page or failed request. Concurrent runs fan
//! out one task per provider with a coarser stop policy; see
//! [`StopPolicy`] for the exact difference.

pub mod concurrent;
pub mod sequential;

use std::sync::Arc;

pub use concurrent::run_concurrent;
pub use sequential::{run_latest, run_sequential};

use crate::config::FetchConfig;
use crate::errors::{AggregateError, FetchError};
use crate::http::{self, HttpClient};
use crate::provider::{Provider, RawResult};

/// How a query is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// One provider at a time, early stop on empty pages
    #[default]
    Sequential,
    /// One task per provider, all dispatched at once
    Concurrent,
    /// Sequential walk over each provider's latest-uploads listing
    LatestOnly,
}

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    term: String,
    page_budget: u32,
    mode: FetchMode,
}

impl Query {
    /// Creates a query, validating the page budget against `config`.
    ///
    /// # Errors
    ///
    /// - `AggregateError::InvalidQuery` - Budget outside `1..=max_page_budget`,
    ///   or an empty term outside latest-only mode
    pub fn new(
        term: impl Into<String>,
        page_budget: u32,
        mode: FetchMode,
        config: &FetchConfig,
    ) -> Result<Self, AggregateError> {
        let term = term.into();

        if page_budget == 0 || page_budget > config.max_page_budget {
            return Err(AggregateError::InvalidQuery {
                reason: format!(
                    "Page limit must be between 1 and {}",
                    config.max_page_budget
                ),
            });
        }

        if mode != FetchMode::LatestOnly && term.trim().is_empty() {
            return Err(AggregateError::InvalidQuery {
                reason: "A search term is required unless fetching latest uploads".to_string(),
            });
        }

        let term = if mode == FetchMode::LatestOnly {
            String::new()
        } else {
            term
        };

        Ok(Self {
            term,
            page_budget,
            mode,
        })
    }

    /// Search term; always empty in latest-only mode.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Maximum requests per provider.
    pub fn page_budget(&self) -> u32 {
        self.page_budget
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Same budget, switched to latest-only with an empty term.
    pub fn to_latest(&self) -> Query {
        Query {
            term: String::new(),
            page_budget: self.page_budget,
            mode: FetchMode::LatestOnly,
        }
    }
}

/// Why a provider's pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every page in the budget was fetched
    BudgetExhausted,
    /// A page yielded no rows; later pages are not requested
    EmptyPage { page: u32 },
    /// The source answered 403, 404 or 500
    Refused { page: u32, status: u16 },
    /// URL building, transport or status failure
    Aborted { page: u32, error: FetchError },
}

impl StopReason {
    /// True when the provider stopped because something went wrong.
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::Refused { .. } | StopReason::Aborted { .. })
    }
}

/// Everything one provider contributed to a run.
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider: String,
    /// Rows in page order
    pub results: Vec<RawResult>,
    /// Pages that answered 200
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl ProviderOutcome {
    /// Short status used by progress renderers.
    pub fn status_glyph(&self) -> String {
        match &self.stop {
            StopReason::Refused { status, .. } => format!("✗ {status}"),
            StopReason::Aborted { error, .. } => format!("✗ {}", error.short_label()),
            StopReason::EmptyPage { .. } | StopReason::BudgetExhausted
                if self.results.is_empty() =>
            {
                "- No results".to_string()
            }
            StopReason::EmptyPage { .. } | StopReason::BudgetExhausted => {
                format!("✓ {} results", self.results.len())
            }
        }
    }
}

/// Receives per-provider progress from a fetch strategy.
///
/// Observers only see events; they never touch the accumulated results.
pub trait ProgressObserver: Send + Sync {
    /// A provider's pagination loop is starting.
    fn provider_started(&self, _provider: &str) {}

    /// A page answered and yielded `count` rows.
    fn page_fetched(&self, _provider: &str, _page: u32, _count: usize) {}

    /// A provider's pagination loop has ended.
    fn provider_finished(&self, _outcome: &ProviderOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Stop rules applied inside one provider's pagination loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop on the first empty page; report 403/404/500 as refusals.
    Granular,
    /// Stop only on failures, all reported alike; empty pages do not stop.
    Coarse,
}

/// Runs `query` over `providers` with the strategy selected by its mode.
pub async fn execute(
    http: &HttpClient,
    providers: &[Arc<Provider>],
    query: &Query,
    config: &FetchConfig,
    observer: &dyn ProgressObserver,
) -> Vec<ProviderOutcome> {
    match query.mode() {
        FetchMode::Sequential => run_sequential(http, providers, query, observer).await,
        FetchMode::LatestOnly => run_latest(http, providers, query, observer).await,
        FetchMode::Concurrent => {
            let outcomes = run_concurrent(http, providers, query, config.max_workers).await;
            for outcome in &outcomes {
                observer.provider_finished(outcome);
            }
            outcomes
        }
    }
}

/// Flattens per-provider outcomes into one list, keeping their order.
pub fn collect_results(outcomes: Vec<ProviderOutcome>) -> Vec<RawResult> {
    outcomes
        .into_iter()
        .flat_map(|outcome| outcome.results)
        .collect()
}

/// Page loop for one provider, bounded by the query's page budget.
pub(crate) async fn paginate(
    http: &HttpClient,
    provider: &Provider,
    query: &Query,
    policy: StopPolicy,
    observer: &dyn ProgressObserver,
) -> ProviderOutcome {
    let mut outcome = ProviderOutcome {
        provider: provider.name().to_string(),
        results: Vec::new(),
        pages_fetched: 0,
        stop: StopReason::BudgetExhausted,
    };

    for page in 0..query.page_budget() {
        let candidate = match query.mode() {
            FetchMode::LatestOnly => provider.build_latest_url(page),
            FetchMode::Sequential | FetchMode::Concurrent => {
                provider.build_query_url(query.term(), page)
            }
        };

        let url = match http::validate_page_url(candidate) {
            Ok(url) => url,
            Err(error) => {
                tracing::info!(provider = provider.name(), page, %error, "no valid page URL");
                outcome.stop = StopReason::Aborted { page, error };
                break;
            }
        };

        let body = match http.get_page(&url).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(provider = provider.name(), page, %error, "page request failed");
                outcome.stop = match error {
                    FetchError::Status { status, .. }
                        if policy == StopPolicy::Granular
                            && FetchError::REFUSAL_STATUSES.contains(&status) =>
                    {
                        StopReason::Refused { page, status }
                    }
                    error => StopReason::Aborted { page, error },
                };
                break;
            }
        };

        outcome.pages_fetched += 1;
        let mut batch = provider.extract_results(&body, query.term());
        observer.page_fetched(provider.name(), page, batch.len());

        if batch.is_empty() {
            tracing::info!(provider = provider.name(), page, "no results on page");
            if policy == StopPolicy::Granular {
                outcome.stop = StopReason::EmptyPage { page };
                break;
            }
            continue;
        }

        tracing::info!(
            provider = provider.name(),
            page,
            count = batch.len(),
            "page yielded results"
        );

        resolve_missing_magnets(http, provider, &mut batch).await;
        outcome.results.append(&mut batch);
    }

    outcome
}

async fn resolve_missing_magnets(http: &HttpClient, provider: &Provider, batch: &mut [RawResult]) {
    for result in batch.iter_mut().filter(|result| result.needs_magnet()) {
        if let Some(detail_url) = result.detail_url.as_deref() {
            result.magnet = provider.resolve_magnet(http, detail_url).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UndertowConfig;

    #[test]
    fn test_query_validation() {
        let config = UndertowConfig::default().fetch;

        assert!(Query::new("foo", 1, FetchMode::Sequential, &config).is_ok());
        assert!(Query::new("foo", 10, FetchMode::Concurrent, &config).is_ok());

        for budget in [0, 11] {
            let error = Query::new("foo", budget, FetchMode::Sequential, &config).unwrap_err();
            assert!(matches!(error, AggregateError::InvalidQuery { .. }));
        }

        assert!(Query::new("  ", 1, FetchMode::Sequential, &config).is_err());
    }

    #[test]
    fn test_latest_query_ignores_term() {
        let config = UndertowConfig::default().fetch;
        let query = Query::new("ignored", 2, FetchMode::LatestOnly, &config).unwrap();

        assert_eq!(query.term(), "");
        assert_eq!(query.page_budget(), 2);
    }

    fn outcome(results: usize, stop: StopReason) -> ProviderOutcome {
        ProviderOutcome {
            provider: "Site".to_string(),
            results: (0..results)
                .map(|i| RawResult::new("Site", format!("row {i}")))
                .collect(),
            pages_fetched: 1,
            stop,
        }
    }

    #[test]
    fn test_status_glyphs() {
        assert_eq!(
            outcome(3, StopReason::EmptyPage { page: 1 }).status_glyph(),
            "✓ 3 results"
        );
        assert_eq!(
            outcome(0, StopReason::EmptyPage { page: 0 }).status_glyph(),
            "- No results"
        );
        assert_eq!(
            outcome(0, StopReason::Refused { page: 0, status: 403 }).status_glyph(),
            "✗ 403"
        );
        assert_eq!(
            outcome(
                0,
                StopReason::Aborted {
                    page: 0,
                    error: FetchError::Timeout {
                        url: "https://example.org".to_string()
                    }
                }
            )
            .status_glyph(),
            "✗ Timeout"
        );
        assert_eq!(
            outcome(
                0,
                StopReason::Aborted {
                    page: 0,
                    error: FetchError::MalformedUrl { url: None }
                }
            )
            .status_glyph(),
            "✗ Skipped"
        );
    }

    #[test]
    fn test_collect_results_keeps_order() {
        let outcomes = vec![
            outcome(2, StopReason::BudgetExhausted),
            outcome(1, StopReason::EmptyPage { page: 1 }),
        ];

        let names: Vec<_> = collect_results(outcomes)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["row 0", "row 1", "row 0"]);
    }
}
