//! Latest-uploads mode uses each site's latest listing, never its search.

use undertow_core::{FetchMode, NoProgress, StopReason};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

use crate::support::{aggregator, listing, mirror, mount_alive, ok_body, site};

#[tokio::test]
async fn test_latest_walks_latest_listing() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("page", "0"))
        .respond_with(ok_body(listing("new", 2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("page", "1"))
        .respond_with(ok_body(""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_body(listing("search", 5)))
        .expect(0)
        .mount(&server)
        .await;

    let aggregator = aggregator(vec![site("Alpha", vec![mirror(&server)])]);
    let query = aggregator.query("", 3, FetchMode::LatestOnly).unwrap();
    let working = aggregator
        .resolve_mirrors(&aggregator.select::<&str>(&[]).unwrap())
        .await;
    let outcomes = aggregator.fetch(&working, &query, &NoProgress).await.unwrap();

    assert_eq!(outcomes[0].results.len(), 2);
    assert_eq!(outcomes[0].stop, StopReason::EmptyPage { page: 1 });
}
