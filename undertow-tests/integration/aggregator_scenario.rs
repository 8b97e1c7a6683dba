//! Full runs through `Aggregator::run`.

use undertow_core::{AggregateError, FetchMode, FilterBounds, NoProgress, StopReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{
    aggregator, dead_mirror, listing, mirror, mount_alive, mount_search_page, ok_body, site,
};

#[tokio::test]
async fn test_failover_pagination_and_refusal_in_one_run() {
    let a_primary = MockServer::start().await;
    let a_backup = MockServer::start().await;
    let b = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&a_primary)
        .await;
    mount_alive(&a_backup).await;
    mount_search_page(&a_backup, 0, ok_body(listing("foo", 3))).await;
    mount_search_page(&a_backup, 1, ok_body("")).await;

    mount_alive(&b).await;
    mount_search_page(&b, 0, ResponseTemplate::new(403)).await;

    let aggregator = aggregator(vec![
        site("A", vec![mirror(&a_primary), mirror(&a_backup)]),
        site("B", vec![mirror(&b)]),
    ]);
    let query = aggregator.query("foo", 2, FetchMode::Sequential).unwrap();

    let report = aggregator
        .run::<&str>(&[], &query, &FilterBounds::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.total_providers, 2);
    assert_eq!(report.available_providers, 2);
    assert_eq!(report.probes[0].endpoint, Some(mirror(&a_backup)));

    let names: Vec<&str> = report.results.iter().map(|r| r.raw.name.as_str()).collect();
    assert_eq!(names, vec!["foo 1", "foo 2", "foo 3"]);
    assert!(report.results.iter().all(|r| r.raw.site_name == "A"));

    assert_eq!(report.outcomes[0].stop, StopReason::EmptyPage { page: 1 });
    assert_eq!(
        report.outcomes[1].stop,
        StopReason::Refused {
            page: 0,
            status: 403
        }
    );

    let indices: Vec<usize> = report.rows.iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_filters_apply_after_fetch() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    mount_search_page(
        &server,
        0,
        ok_body(
            "Small|200 MB|50|1|magnet:?xt=urn:btih:small\n\
             Large|4 GB|80|3|magnet:?xt=urn:btih:large\n\
             Unknown|-|N/A|-|magnet:?xt=urn:btih:unknown\n\
             Few seeds|1 GB|2|0|magnet:?xt=urn:btih:few\n",
        ),
    )
    .await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();
    let bounds = FilterBounds {
        min_seeds: Some(10),
        ..Default::default()
    }
    .with_min_size_text("500MB");

    let report = aggregator
        .run::<&str>(&[], &query, &bounds, &NoProgress)
        .await
        .unwrap();

    let names: Vec<&str> = report.results.iter().map(|r| r.raw.name.as_str()).collect();
    assert_eq!(names, vec!["Large"]);
    assert_eq!(report.rows[0].size, "4 GB");
}

#[tokio::test]
async fn test_allow_list_limits_probing() {
    let chosen = MockServer::start().await;
    let ignored = MockServer::start().await;
    mount_alive(&chosen).await;
    mount_search_page(&chosen, 0, ok_body(listing("foo", 1))).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ignored)
        .await;

    let aggregator = aggregator(vec![
        site("Ignored", vec![mirror(&ignored)]),
        site("Chosen", vec![mirror(&chosen)]),
    ]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();

    let report = aggregator
        .run(&[" chosen "], &query, &FilterBounds::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.total_providers, 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].raw.site_name, "Chosen");
}

#[tokio::test]
async fn test_unknown_allow_list_is_rejected() {
    let aggregator = aggregator(vec![site("Alpha", vec![dead_mirror()])]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();

    let error = aggregator
        .run(&["Nowhere"], &query, &FilterBounds::default(), &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(error, AggregateError::NoMatchingProviders { .. }));
}
