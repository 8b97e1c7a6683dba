//! Real site parsers served from a mock mirror.

use std::sync::Arc;

use undertow_core::{Aggregator, FetchMode, FilterBounds, NoProgress, SiteParser, UndertowConfig};
use undertow_search::providers::{Nyaa, X1337};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

use crate::support::{mirror, mount_alive, ok_body};

const NYAA_PAGE: &str = r#"
<html><body>
<table class="table table-bordered torrent-list">
  <thead><tr><th>Category</th><th>Name</th><th>Link</th><th>Size</th><th>Date</th><th>S</th><th>L</th><th>C</th></tr></thead>
  <tbody>
    <tr>
      <td><a href="/?c=1_2">Anime</a></td>
      <td><a href="/view/10" title="[Sub] Show - 02">[Sub] Show - 02</a></td>
      <td><a href="/download/10.torrent">t</a><a href="magnet:?xt=urn:btih:show02">m</a></td>
      <td>700.1 MiB</td>
      <td>2024-05-01 10:00</td>
      <td>120</td>
      <td>4</td>
      <td>900</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

const X1337_PAGE: &str = r#"
<table class="table-list">
  <thead><tr><th>name</th><th>se</th><th>le</th><th>time</th><th>size</th></tr></thead>
  <tbody>
    <tr>
      <td class="name"><a href="/sub/1/0/" class="icon"></a><a href="/torrent/7/debian-12/">Debian 12</a></td>
      <td class="seeds">64</td>
      <td class="leeches">2</td>
      <td class="coll-date">Jun. 10th '24</td>
      <td class="size">3.7 GB<span class="seeds">64</span></td>
    </tr>
  </tbody>
</table>
"#;

#[tokio::test]
async fn test_nyaa_listing_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "show"))
        .and(query_param("p", "1"))
        .respond_with(ok_body(NYAA_PAGE))
        .mount(&server)
        .await;
    mount_alive(&server).await;

    let nyaa: Arc<dyn SiteParser> = Arc::new(Nyaa::with_mirrors(vec![mirror(&server)]));
    let aggregator = Aggregator::new(UndertowConfig::for_testing(), vec![nyaa]).unwrap();
    let query = aggregator.query("show", 1, FetchMode::Sequential).unwrap();

    let report = aggregator
        .run(&["nyaa"], &query, &FilterBounds::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    let row = &report.results[0].raw;
    assert_eq!(row.site_name, Nyaa::NAME);
    assert_eq!(row.name, "[Sub] Show - 02");
    assert_eq!(row.magnet.as_deref(), Some("magnet:?xt=urn:btih:show02"));
    assert_eq!(row.seeds_text, "120");
}

#[tokio::test]
async fn test_1337x_magnet_comes_from_detail_page() {
    let server = MockServer::start().await;
    mount_alive(&server).await;
    Mock::given(method("GET"))
        .and(path("/search/debian/1/"))
        .respond_with(ok_body(X1337_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torrent/7/debian-12/"))
        .respond_with(ok_body(
            r#"<ul><li><a href="magnet:?xt=urn:btih:debian12">Magnet Download</a></li></ul>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let x1337: Arc<dyn SiteParser> = Arc::new(X1337::with_mirrors(vec![mirror(&server)]));
    let aggregator = Aggregator::new(UndertowConfig::for_testing(), vec![x1337]).unwrap();
    let query = aggregator.query("debian", 1, FetchMode::Sequential).unwrap();

    let report = aggregator
        .run::<&str>(&[], &query, &FilterBounds::default(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    let row = &report.results[0].raw;
    assert_eq!(row.name, "Debian 12");
    assert_eq!(row.size_text, "3.7 GB");
    assert_eq!(row.magnet.as_deref(), Some("magnet:?xt=urn:btih:debian12"));
}
