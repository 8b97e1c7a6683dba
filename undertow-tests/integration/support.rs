//! Shared fixtures: a line-based fake site and mock server helpers.

use std::sync::Arc;
use std::time::Duration;

use undertow_core::{Aggregator, ProviderDescriptor, RawResult, SiteParser, UndertowConfig};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fake site whose listing body is one row per line:
/// `name|size|seeds|leeches|link`, where `link` is either a magnet URI
/// or a detail path on the same server.
#[derive(Debug)]
pub struct LineSite {
    descriptor: ProviderDescriptor,
    paging: Paging,
}

/// Which search URLs a [`LineSite`] builds after its first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Unbounded,
    /// No URL at all past page 0
    FirstPageOnly,
    /// A relative path past page 0
    RelativeAfterFirst,
}

impl LineSite {
    pub fn new(name: &str, mirrors: Vec<Url>) -> Self {
        Self::with_paging(name, mirrors, Paging::Unbounded)
    }

    pub fn with_paging(name: &str, mirrors: Vec<Url>, paging: Paging) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(name, mirrors),
            paging,
        }
    }
}

impl SiteParser for LineSite {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        if page > 0 {
            match self.paging {
                Paging::Unbounded => {}
                Paging::FirstPageOnly => return None,
                Paging::RelativeAfterFirst => {
                    return Some(format!("/search?q={term}&page={page}"));
                }
            }
        }

        let mut url = base.join("search").ok()?;
        url.query_pairs_mut()
            .append_pair("q", term)
            .append_pair("page", &page.to_string());
        Some(url.into())
    }

    fn build_latest_url(&self, base: &Url, page: u32) -> Option<String> {
        let mut url = base.join("latest").ok()?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Some(url.into())
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        String::from_utf8_lossy(body)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let fields: Vec<&str> = line.split('|').collect();
                let [name, size, seeds, leeches, link] = fields.as_slice() else {
                    return None;
                };

                let row = RawResult::new(self.descriptor.name.as_str(), *name)
                    .with_size(*size)
                    .with_peers(*seeds, *leeches);
                Some(if link.starts_with("magnet:") {
                    row.with_magnet(Some(link.to_string()))
                } else {
                    row.with_detail_url(base.join(link).ok().map(String::from))
                })
            })
            .collect()
    }
}

/// Mirror URL of a running mock server.
pub fn mirror(server: &MockServer) -> Url {
    Url::parse(&server.uri()).unwrap()
}

/// An endpoint nothing listens on.
pub fn dead_mirror() -> Url {
    Url::parse("http://127.0.0.1:1").unwrap()
}

pub fn site(name: &str, mirrors: Vec<Url>) -> Arc<dyn SiteParser> {
    Arc::new(LineSite::new(name, mirrors))
}

pub fn paged_site(name: &str, mirrors: Vec<Url>, paging: Paging) -> Arc<dyn SiteParser> {
    Arc::new(LineSite::with_paging(name, mirrors, paging))
}

/// Aggregator with short timeouts over the given sites.
pub fn aggregator(sites: Vec<Arc<dyn SiteParser>>) -> Aggregator {
    Aggregator::new(UndertowConfig::for_testing(), sites).unwrap()
}

/// Aggregator whose page requests give up after `page_timeout`.
pub fn aggregator_with_page_timeout(
    sites: Vec<Arc<dyn SiteParser>>,
    page_timeout: Duration,
) -> Aggregator {
    let mut config = UndertowConfig::for_testing();
    config.network.page_timeout = page_timeout;
    Aggregator::new(config, sites).unwrap()
}

/// Listing body with `count` rows named `{prefix} {i}`, each with an inline magnet.
pub fn listing(prefix: &str, count: usize) -> String {
    (1..=count)
        .map(|i| format!("{prefix} {i}|1.{i} GB|{i}0|{i}|magnet:?xt=urn:btih:{prefix}{i}\n"))
        .collect()
}

/// Answers the root probe with 200.
pub async fn mount_alive(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(server)
        .await;
}

/// Serves `body` for search page `page`.
pub async fn mount_search_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn ok_body(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body.into())
}
