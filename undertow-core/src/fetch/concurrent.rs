//! Concurrent strategy: one task per provider on a bounded pool.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{NoProgress, ProviderOutcome, Query, StopPolicy, paginate};
use crate::http::HttpClient;
use crate::provider::Provider;

/// Dispatches every provider at once and collects outcomes as tasks finish.
///
/// At most `max_workers` providers paginate at the same time. Tasks share
/// nothing except the append-only outcome sink, so the returned order is
/// completion order; within one provider, page order is preserved.
///
/// Unlike [`super::run_sequential`], any failed request ends a provider with
/// [`super::StopReason::Aborted`] (no refusal distinction) and an empty page
/// does not stop pagination.
pub async fn run_concurrent(
    http: &HttpClient,
    providers: &[Arc<Provider>],
    query: &Query,
    max_workers: usize,
) -> Vec<ProviderOutcome> {
    let pool = Arc::new(Semaphore::new(max_workers.max(1)));
    let sink: Arc<Mutex<Vec<ProviderOutcome>>> =
        Arc::new(Mutex::new(Vec::with_capacity(providers.len())));
    let mut tasks = JoinSet::new();

    for provider in providers {
        let http = http.clone();
        let provider = Arc::clone(provider);
        let query = query.clone();
        let pool = Arc::clone(&pool);
        let sink = Arc::clone(&sink);

        tasks.spawn(async move {
            let _permit = pool.acquire_owned().await.ok();
            let outcome = paginate(&http, &provider, &query, StopPolicy::Coarse, &NoProgress).await;

            tracing::info!(
                provider = %outcome.provider,
                results = outcome.results.len(),
                pages = outcome.pages_fetched,
                stop = ?outcome.stop,
                "provider task finished"
            );

            sink.lock().push(outcome);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::warn!(error = %e, "provider task did not complete");
        }
    }

    std::mem::take(&mut *sink.lock())
}
