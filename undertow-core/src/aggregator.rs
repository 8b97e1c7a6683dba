//! Orchestration of one aggregation run.
//!
//! A run selects providers from the registry, pins mirrors, executes the
//! query with the requested strategy and finally normalizes and filters the
//! flat result list. All state lives for one invocation only.

use std::sync::Arc;

use crate::config::UndertowConfig;
use crate::errors::AggregateError;
use crate::fetch::{self, FetchMode, ProgressObserver, ProviderOutcome, Query};
use crate::filter::{FilterBounds, filter};
use crate::http::HttpClient;
use crate::mirror::{MirrorResolver, ProbeStatus, WorkingSet};
use crate::normalize::{CanonicalResult, DisplayRow, normalize_all, project_all};
use crate::provider::{Provider, SiteParser};

/// Final output of a run, ready for renderers and exporters.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Filtered results in fetch order
    pub results: Vec<CanonicalResult>,
    /// Display projection of `results`, numbered from 1
    pub rows: Vec<DisplayRow>,
    /// Per-provider pagination outcomes in fetch order
    pub outcomes: Vec<ProviderOutcome>,
    /// Mirror probe results for every attempted provider
    pub probes: Vec<ProbeStatus>,
    /// Providers that were attempted
    pub total_providers: usize,
    /// Providers that pinned a mirror
    pub available_providers: usize,
}

/// Entry point tying the registry to the engine.
///
/// Only the stateless parsers are kept between runs. Every selection wraps
/// them in fresh providers, so mirror pins never outlive one invocation.
#[derive(Debug)]
pub struct Aggregator {
    http: HttpClient,
    config: UndertowConfig,
    parsers: Vec<Arc<dyn SiteParser>>,
}

impl Aggregator {
    /// Keeps `parsers` in registry order.
    ///
    /// # Errors
    ///
    /// - `AggregateError::Configuration` - Configuration failed validation
    /// - `AggregateError::HttpClient` - HTTP client could not be built
    pub fn new(
        config: UndertowConfig,
        parsers: Vec<Arc<dyn SiteParser>>,
    ) -> Result<Self, AggregateError> {
        config.validate()?;
        let http = HttpClient::new(&config.network)?;

        Ok(Self {
            http,
            config,
            parsers,
        })
    }

    pub fn config(&self) -> &UndertowConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Registered parsers in registry order.
    pub fn parsers(&self) -> &[Arc<dyn SiteParser>] {
        &self.parsers
    }

    /// Builds a validated query against this aggregator's limits.
    ///
    /// # Errors
    ///
    /// - `AggregateError::InvalidQuery` - See [`Query::new`]
    pub fn query(
        &self,
        term: impl Into<String>,
        page_budget: u32,
        mode: FetchMode,
    ) -> Result<Query, AggregateError> {
        Query::new(term, page_budget, mode, &self.config.fetch)
    }

    /// Applies a provider allow-list and returns fresh, unpinned providers.
    ///
    /// Names match case-insensitively after trimming; blank entries are
    /// ignored. An empty allow-list selects every provider. Registry order is
    /// kept regardless of the order names were given in.
    ///
    /// # Errors
    ///
    /// - `AggregateError::NoMatchingProviders` - A non-empty allow-list matched nothing
    pub fn select<S: AsRef<str>>(
        &self,
        allow_list: &[S],
    ) -> Result<Vec<Arc<Provider>>, AggregateError> {
        let wanted: Vec<String> = allow_list
            .iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        let name_of = |parser: &Arc<dyn SiteParser>| parser.descriptor().name.to_lowercase();

        for name in &wanted {
            if !self.parsers.iter().any(|parser| name_of(parser) == *name) {
                tracing::warn!(site = %name, "unknown site in selection");
            }
        }

        let selected: Vec<_> = self
            .parsers
            .iter()
            .filter(|parser| wanted.is_empty() || wanted.contains(&name_of(*parser)))
            .map(|parser| Arc::new(Provider::new(Arc::clone(parser))))
            .collect();

        if selected.is_empty() && !wanted.is_empty() {
            return Err(AggregateError::NoMatchingProviders { requested: wanted });
        }

        Ok(selected)
    }

    /// Pins a mirror for each of `providers`.
    pub async fn resolve_mirrors(&self, providers: &[Arc<Provider>]) -> WorkingSet {
        MirrorResolver::new(self.http.clone())
            .resolve_all(providers)
            .await
    }

    /// Runs `query` over the working set.
    ///
    /// # Errors
    ///
    /// - `AggregateError::TotalUnavailability` - No provider pinned a mirror;
    ///   nothing is fetched
    pub async fn fetch(
        &self,
        working: &WorkingSet,
        query: &Query,
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<ProviderOutcome>, AggregateError> {
        if working.is_empty() {
            return Err(AggregateError::TotalUnavailability {
                attempted: working.attempted(),
            });
        }

        Ok(fetch::execute(
            &self.http,
            &working.providers,
            query,
            &self.config.fetch,
            observer,
        )
        .await)
    }

    /// Full run: select, resolve, fetch, then normalize and filter.
    ///
    /// # Errors
    ///
    /// - `AggregateError::NoMatchingProviders` - Allow-list matched nothing
    /// - `AggregateError::TotalUnavailability` - No provider pinned a mirror
    pub async fn run<S: AsRef<str>>(
        &self,
        allow_list: &[S],
        query: &Query,
        bounds: &FilterBounds,
        observer: &dyn ProgressObserver,
    ) -> Result<AggregateReport, AggregateError> {
        let selected = self.select(allow_list)?;
        let working = self.resolve_mirrors(&selected).await;
        let outcomes = self.fetch(&working, query, observer).await?;
        Ok(finish(&working, outcomes, bounds))
    }
}

/// Normalizes and filters fetched rows into a report.
///
/// Filtering happens only here, after every provider has finished.
pub fn finish(
    working: &WorkingSet,
    outcomes: Vec<ProviderOutcome>,
    bounds: &FilterBounds,
) -> AggregateReport {
    let raw = outcomes
        .iter()
        .flat_map(|outcome| outcome.results.iter().cloned())
        .collect();
    let canonical = normalize_all(raw);
    let results = filter(&canonical, bounds);

    tracing::info!(
        fetched = canonical.len(),
        kept = results.len(),
        "filtered results"
    );

    AggregateReport {
        rows: project_all(&results),
        results,
        outcomes,
        probes: working.probes.clone(),
        total_providers: working.attempted(),
        available_providers: working.available(),
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::fetch::StopReason;
    use crate::provider::{ProviderDescriptor, RawResult};

    #[derive(Debug)]
    struct NamedParser {
        descriptor: ProviderDescriptor,
    }

    impl NamedParser {
        fn registered(name: &str) -> Arc<dyn SiteParser> {
            Arc::new(Self {
                descriptor: ProviderDescriptor::from_mirrors(name, &["https://example.invalid"]),
            })
        }
    }

    impl SiteParser for NamedParser {
        fn descriptor(&self) -> &ProviderDescriptor {
            &self.descriptor
        }

        fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
            Some(format!("{base}?q={term}&page={page}"))
        }

        fn extract_results(&self, _base: &Url, _body: &[u8], _term: &str) -> Vec<RawResult> {
            Vec::new()
        }
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(
            UndertowConfig::for_testing(),
            vec![
                NamedParser::registered("The Pirate Bay"),
                NamedParser::registered("Nyaa"),
                NamedParser::registered("YTS"),
            ],
        )
        .unwrap()
    }

    fn names(providers: &[Arc<Provider>]) -> Vec<&str> {
        providers.iter().map(|p| p.name()).collect()
    }

    #[test]
    fn test_empty_allow_list_selects_all() {
        let aggregator = aggregator();
        let selected = aggregator.select::<&str>(&[]).unwrap();
        assert_eq!(names(&selected), vec!["The Pirate Bay", "Nyaa", "YTS"]);
    }

    #[test]
    fn test_allow_list_is_case_insensitive_and_keeps_registry_order() {
        let aggregator = aggregator();
        let selected = aggregator.select(&[" yts ", "NYAA", "unknown"]).unwrap();
        assert_eq!(names(&selected), vec!["Nyaa", "YTS"]);
    }

    #[test]
    fn test_each_selection_starts_unpinned() {
        let aggregator = aggregator();
        let first = aggregator.select(&["nyaa"]).unwrap();
        assert!(first[0].pin(Url::parse("https://nyaa.si").unwrap()));

        let second = aggregator.select(&["nyaa"]).unwrap();
        assert!(!Arc::ptr_eq(&first[0], &second[0]));
        assert!(!second[0].is_available());
    }

    #[test]
    fn test_allow_list_without_matches() {
        let aggregator = aggregator();
        let error = aggregator.select(&["nowhere"]).unwrap_err();
        assert!(matches!(
            error,
            AggregateError::NoMatchingProviders { ref requested } if requested == &["nowhere"]
        ));
    }

    #[tokio::test]
    async fn test_fetch_refuses_empty_working_set() {
        let aggregator = aggregator();
        let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();
        let working = WorkingSet {
            providers: Vec::new(),
            probes: vec![ProbeStatus {
                provider: "Nyaa".to_string(),
                endpoint: None,
            }],
        };

        let error = aggregator
            .fetch(&working, &query, &fetch::NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            AggregateError::TotalUnavailability { attempted: 1 }
        ));
    }

    #[test]
    fn test_finish_filters_after_fetch() {
        let outcomes = vec![ProviderOutcome {
            provider: "Nyaa".to_string(),
            results: vec![
                RawResult::new("Nyaa", "seeded").with_peers("40", "1"),
                RawResult::new("Nyaa", "unknown"),
            ],
            pages_fetched: 1,
            stop: StopReason::BudgetExhausted,
        }];
        let bounds = FilterBounds {
            min_seeds: Some(1),
            ..Default::default()
        };

        let report = finish(&WorkingSet::default(), outcomes, &bounds);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.rows[0].index, 1);
        assert_eq!(report.rows[0].name, "seeded");
        assert_eq!(report.outcomes[0].results.len(), 2);
    }
}
