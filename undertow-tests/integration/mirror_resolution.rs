//! Mirror pinning against live and dead candidates.

use undertow_core::{FetchMode, FilterBounds, NoProgress};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{
    aggregator, dead_mirror, listing, mirror, mount_alive, mount_search_page, ok_body, site,
};

#[tokio::test]
async fn test_first_live_candidate_is_pinned_and_later_ones_untouched() {
    let failing = MockServer::start().await;
    let live = MockServer::start().await;
    let spare = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&failing)
        .await;
    mount_alive(&live).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&spare)
        .await;

    let aggregator = aggregator(vec![site(
        "Alpha",
        vec![dead_mirror(), mirror(&failing), mirror(&live), mirror(&spare)],
    )]);
    let selected = aggregator.select::<&str>(&[]).unwrap();
    let working = aggregator.resolve_mirrors(&selected).await;

    assert_eq!(working.available(), 1);
    assert_eq!(working.probes[0].endpoint, Some(mirror(&live)));
    assert_eq!(
        working.providers[0].pinned_endpoint(),
        Some(&mirror(&live))
    );
}

#[tokio::test]
async fn test_provider_without_live_mirror_is_excluded() {
    let live = MockServer::start().await;
    mount_alive(&live).await;

    let aggregator = aggregator(vec![
        site("Dead", vec![dead_mirror()]),
        site("Alive", vec![mirror(&live)]),
        site("Empty", Vec::new()),
    ]);
    let selected = aggregator.select::<&str>(&[]).unwrap();
    let working = aggregator.resolve_mirrors(&selected).await;

    assert_eq!(working.attempted(), 3);
    assert_eq!(working.available(), 1);
    assert_eq!(working.providers[0].name(), "Alive");

    let statuses: Vec<(&str, bool)> = working
        .probes
        .iter()
        .map(|probe| (probe.provider.as_str(), probe.is_working()))
        .collect();
    assert_eq!(
        statuses,
        vec![("Dead", false), ("Alive", true), ("Empty", false)]
    );
}

#[tokio::test]
async fn test_every_run_rechecks_mirrors() {
    let live = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&live)
        .await;
    mount_search_page(&live, 0, ok_body(listing("foo", 1))).await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&live)])]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();

    for _ in 0..2 {
        let report = aggregator
            .run::<&str>(&[], &query, &FilterBounds::default(), &NoProgress)
            .await
            .unwrap();
        assert_eq!(report.available_providers, 1);
        assert_eq!(report.results.len(), 1);
    }

    let root_hits = live
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/")
        .count();
    assert_eq!(root_hits, 2);
}
