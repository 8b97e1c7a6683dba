//! Sequential pagination stop rules and magnet follow-up.

use std::time::Duration;

use undertow_core::{FetchError, FetchMode, NoProgress, StopReason};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{
    Paging, aggregator, aggregator_with_page_timeout, listing, mirror, mount_alive,
    mount_search_page, ok_body, paged_site, site,
};

#[tokio::test]
async fn test_empty_page_stops_pagination() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    mount_search_page(&server, 0, ok_body(listing("foo", 3))).await;
    mount_search_page(&server, 1, ok_body("")).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ok_body(listing("late", 2)))
        .expect(0)
        .mount(&server)
        .await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
    let query = aggregator.query("foo", 3, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].results.len(), 3);
    assert_eq!(outcomes[0].pages_fetched, 2);
    assert_eq!(outcomes[0].stop, StopReason::EmptyPage { page: 1 });
}

#[tokio::test]
async fn test_refusal_is_local_to_provider() {
    let refusing = MockServer::start().await;
    let healthy = MockServer::start().await;
    mount_alive(&refusing).await;
    mount_alive(&healthy).await;
    mount_search_page(&refusing, 0, ResponseTemplate::new(403)).await;
    mount_search_page(&healthy, 0, ok_body(listing("foo", 2))).await;

    let aggregator = aggregator(vec![
        site("Refusing", vec![mirror(&refusing)]),
        site("Healthy", vec![mirror(&healthy)]),
    ]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert_eq!(
        outcomes[0].stop,
        StopReason::Refused {
            page: 0,
            status: 403
        }
    );
    assert!(outcomes[0].results.is_empty());
    assert_eq!(outcomes[1].stop, StopReason::BudgetExhausted);
    assert_eq!(outcomes[1].results.len(), 2);
}

#[tokio::test]
async fn test_slow_page_times_out_and_keeps_earlier_rows() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    mount_search_page(&server, 0, ok_body(listing("foo", 2))).await;
    mount_search_page(
        &server,
        1,
        ok_body(listing("slow", 2)).set_delay(Duration::from_secs(3)),
    )
    .await;

    let aggregator = aggregator_with_page_timeout(
        vec![site("Alpha", vec![mirror(&server)])],
        Duration::from_millis(300),
    );
    let query = aggregator.query("foo", 2, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert_eq!(outcomes[0].results.len(), 2);
    assert!(matches!(
        outcomes[0].stop,
        StopReason::Aborted {
            page: 1,
            error: FetchError::Timeout { .. }
        }
    ));
}

#[tokio::test]
async fn test_missing_magnet_is_resolved_from_detail_page() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    mount_search_page(
        &server,
        0,
        ok_body("With detail|700 MB|5|1|/torrent/1\nBroken detail|1 GB|2|0|/torrent/2\n"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/torrent/1"))
        .respond_with(ok_body(
            r#"<a href="/dl/1.torrent">t</a><a href="magnet:?xt=urn:btih:detail1&amp;dn=x">m</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torrent/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    let results = &outcomes[0].results;
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].magnet.as_deref(),
        Some("magnet:?xt=urn:btih:detail1&dn=x")
    );
    assert_eq!(results[1].magnet, None);
    assert_eq!(outcomes[0].stop, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn test_empty_working_set_is_total_unavailability() {
    let aggregator = aggregator(vec![site("Dead", vec![crate::support::dead_mirror()])]);
    let query = aggregator.query("foo", 1, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;

    let error = aggregator
        .fetch(&working, &query, &NoProgress)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        undertow_core::AggregateError::TotalUnavailability { attempted: 1 }
    ));
}

#[tokio::test]
async fn test_not_found_and_server_error_are_refusals() {
    for status in [404, 500] {
        let server = MockServer::start().await;
        mount_alive(&server).await;
        mount_search_page(&server, 0, ok_body(listing("foo", 2))).await;
        mount_search_page(&server, 1, ResponseTemplate::new(status)).await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("page", "2"))
            .respond_with(ok_body(listing("late", 1)))
            .expect(0)
            .mount(&server)
            .await;

        let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
        let query = aggregator.query("foo", 3, FetchMode::Sequential).unwrap();
        let working = aggregator
            .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
            .await;
        let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

        assert_eq!(outcomes[0].results.len(), 2);
        assert_eq!(outcomes[0].stop, StopReason::Refused { page: 1, status });
    }
}

#[tokio::test]
async fn test_other_status_aborts_without_refusal() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    mount_search_page(&server, 0, ResponseTemplate::new(502)).await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
    let query = aggregator.query("foo", 2, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert!(outcomes[0].results.is_empty());
    assert!(matches!(
        outcomes[0].stop,
        StopReason::Aborted {
            page: 0,
            error: FetchError::Status { status: 502, .. }
        }
    ));
}

#[tokio::test]
async fn test_malformed_url_mid_pagination_is_local() {
    let missing = MockServer::start().await;
    let relative = MockServer::start().await;
    let healthy = MockServer::start().await;
    for server in [&missing, &relative, &healthy] {
        mount_alive(server).await;
        mount_search_page(server, 0, ok_body(listing("foo", 2))).await;
        mount_search_page(server, 1, ok_body(listing("bar", 1))).await;
    }

    let aggregator = aggregator(vec![
        paged_site("Missing", vec![mirror(&missing)], Paging::FirstPageOnly),
        paged_site("Relative", vec![mirror(&relative)], Paging::RelativeAfterFirst),
        site("Healthy", vec![mirror(&healthy)]),
    ]);
    let query = aggregator.query("foo", 2, FetchMode::Sequential).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert!(matches!(
        outcomes[0].stop,
        StopReason::Aborted {
            page: 1,
            error: FetchError::MalformedUrl { url: None }
        }
    ));
    assert!(matches!(
        &outcomes[1].stop,
        StopReason::Aborted {
            page: 1,
            error: FetchError::MalformedUrl { url: Some(url) }
        } if url.starts_with("/search")
    ));
    for outcome in &outcomes[..2] {
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.pages_fetched, 1);
    }

    assert_eq!(outcomes[2].stop, StopReason::BudgetExhausted);
    assert_eq!(outcomes[2].results.len(), 3);
}
