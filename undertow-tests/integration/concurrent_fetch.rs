//! Concurrent strategy: coarse stop rules and independent providers.

use undertow_core::{FetchError, FetchMode, NoProgress, StopReason};
use wiremock::{MockServer, ResponseTemplate};

use crate::support::{aggregator, listing, mirror, mount_alive, mount_search_page, ok_body, site};

#[tokio::test]
async fn test_empty_page_does_not_stop_concurrent_pagination() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    mount_search_page(&server, 0, ok_body("")).await;
    mount_search_page(&server, 1, ok_body(listing("foo", 2))).await;
    mount_search_page(&server, 2, ok_body(listing("bar", 1))).await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
    let query = aggregator.query("foo", 3, FetchMode::Concurrent).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    let names: Vec<&str> = outcomes[0]
        .results
        .iter()
        .map(|result| result.name.as_str())
        .collect();
    assert_eq!(names, vec!["foo 1", "foo 2", "bar 1"]);
    assert_eq!(outcomes[0].pages_fetched, 3);
    assert_eq!(outcomes[0].stop, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn test_refusal_is_reported_as_abort() {
    let refusing = MockServer::start().await;
    let healthy = MockServer::start().await;
    mount_alive(&refusing).await;
    mount_alive(&healthy).await;
    mount_search_page(&refusing, 0, ok_body(listing("early", 1))).await;
    mount_search_page(&refusing, 1, ResponseTemplate::new(403)).await;
    mount_search_page(&healthy, 0, ok_body(listing("foo", 2))).await;
    mount_search_page(&healthy, 1, ok_body(listing("more", 2))).await;

    let aggregator = aggregator(vec![
        site("Refusing", vec![mirror(&refusing)]),
        site("Healthy", vec![mirror(&healthy)]),
    ]);
    let query = aggregator.query("foo", 2, FetchMode::Concurrent).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert_eq!(outcomes.len(), 2);

    let refusing = outcomes
        .iter()
        .find(|outcome| outcome.provider == "Refusing")
        .unwrap();
    assert_eq!(refusing.results.len(), 1);
    assert!(matches!(
        refusing.stop,
        StopReason::Aborted {
            page: 1,
            error: FetchError::Status { status: 403, .. }
        }
    ));

    let healthy = outcomes
        .iter()
        .find(|outcome| outcome.provider == "Healthy")
        .unwrap();
    assert_eq!(healthy.results.len(), 4);
    assert_eq!(healthy.stop, StopReason::BudgetExhausted);
}
