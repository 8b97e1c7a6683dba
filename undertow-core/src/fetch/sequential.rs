//! Sequential strategy: one provider at a time, one request outstanding.

use std::sync::Arc;

use super::{ProgressObserver, ProviderOutcome, Query, StopPolicy, paginate};
use crate::http::HttpClient;
use crate::provider::Provider;

/// Walks `providers` in order with the granular stop policy.
///
/// Each provider's loop ends on its first empty page, refusal (403/404/500),
/// other non-200 status, timeout or connection failure. A stopped provider
/// never affects the next one or rows already collected.
pub async fn run_sequential(
    http: &HttpClient,
    providers: &[Arc<Provider>],
    query: &Query,
    observer: &dyn ProgressObserver,
) -> Vec<ProviderOutcome> {
    let mut outcomes = Vec::with_capacity(providers.len());

    for provider in providers {
        observer.provider_started(provider.name());
        let outcome = paginate(http, provider, query, StopPolicy::Granular, observer).await;

        tracing::info!(
            provider = %outcome.provider,
            results = outcome.results.len(),
            pages = outcome.pages_fetched,
            stop = ?outcome.stop,
            "provider finished"
        );

        observer.provider_finished(&outcome);
        outcomes.push(outcome);
    }

    outcomes
}

/// Latest-uploads walk: sequential, with each provider's latest URL builder.
///
/// Stop conditions are the same as [`run_sequential`]; rows are extracted
/// with an empty search term.
pub async fn run_latest(
    http: &HttpClient,
    providers: &[Arc<Provider>],
    query: &Query,
    observer: &dyn ProgressObserver,
) -> Vec<ProviderOutcome> {
    let query = query.to_latest();
    run_sequential(http, providers, &query, observer).await
}
