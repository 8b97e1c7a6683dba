//! Provider capability contract and per-session provider state.
//!
//! A site parser only knows how to build URLs against a base endpoint and how
//! to pull rows out of a response body. Mirror pinning, site attribution and
//! magnet fallback are layered on top by [`Provider`], so every parser shares
//! the same behaviour without inheriting it.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use url::Url;

use crate::http::HttpClient;
use crate::magnet;

/// Sentinel for "not provided by this source".
pub const NOT_PROVIDED: &str = "-";

/// One listing row as extracted from a provider page.
///
/// Every textual field may legitimately hold [`NOT_PROVIDED`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    pub name: String,
    pub size_text: String,
    pub seeds_text: String,
    pub leeches_text: String,
    pub date_text: String,
    pub magnet: Option<String>,
    pub site_name: String,
    /// Detail page used to resolve a magnet when none was inline
    pub detail_url: Option<String>,
}

impl RawResult {
    /// Creates a row with every optional column set to the sentinel.
    pub fn new(site_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_text: NOT_PROVIDED.to_string(),
            seeds_text: NOT_PROVIDED.to_string(),
            leeches_text: NOT_PROVIDED.to_string(),
            date_text: NOT_PROVIDED.to_string(),
            magnet: None,
            site_name: site_name.into(),
            detail_url: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size_text = size.into();
        self
    }

    pub fn with_peers(mut self, seeds: impl Into<String>, leeches: impl Into<String>) -> Self {
        self.seeds_text = seeds.into();
        self.leeches_text = leeches.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date_text = date.into();
        self
    }

    pub fn with_magnet(mut self, magnet: Option<String>) -> Self {
        self.magnet = magnet;
        self
    }

    pub fn with_detail_url(mut self, detail_url: Option<String>) -> Self {
        self.detail_url = detail_url;
        self
    }

    /// True when the row still needs a detail-page lookup for its magnet.
    pub fn needs_magnet(&self) -> bool {
        self.magnet.is_none() && self.detail_url.is_some()
    }
}

/// Static identity of a content source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub name: String,
    /// Mirrors in the order they are probed
    pub candidate_endpoints: Vec<Url>,
}

impl ProviderDescriptor {
    /// Builds a descriptor from already parsed endpoints.
    pub fn new(name: impl Into<String>, candidate_endpoints: Vec<Url>) -> Self {
        Self {
            name: name.into(),
            candidate_endpoints,
        }
    }

    /// Builds a descriptor from mirror strings, dropping any that do not parse.
    pub fn from_mirrors(name: impl Into<String>, mirrors: &[&str]) -> Self {
        let name = name.into();
        let candidate_endpoints = mirrors
            .iter()
            .filter_map(|mirror| match Url::parse(mirror) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(provider = %name, mirror, error = %e, "ignoring unparsable mirror");
                    None
                }
            })
            .collect();

        Self {
            name,
            candidate_endpoints,
        }
    }
}

/// Capabilities a site parser exposes to the engine.
///
/// Implementations are stateless with respect to the session: the pinned
/// endpoint is passed in as `base` on every call.
#[async_trait]
pub trait SiteParser: Send + Sync + fmt::Debug {
    /// Name and ordered mirror list of this source.
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Search URL for `term` on zero-based `page`, or `None` when the source
    /// cannot serve the request.
    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String>;

    /// URL listing the newest uploads on `page`.
    fn build_latest_url(&self, base: &Url, page: u32) -> Option<String> {
        self.build_query_url(base, "", page)
    }

    /// Extracts listing rows from a response body. Unparsable rows are skipped.
    fn extract_results(&self, base: &Url, body: &[u8], term: &str) -> Vec<RawResult>;

    /// Best-effort magnet lookup through a secondary fetch of `detail_url`.
    async fn resolve_magnet(&self, http: &HttpClient, detail_url: &str) -> Option<String> {
        magnet::resolve_from_detail_page(http, detail_url).await
    }
}

/// A site parser plus the state it carries through one session.
///
/// The pinned endpoint is written at most once by the mirror resolver and
/// never changes afterwards.
pub struct Provider {
    parser: Arc<dyn SiteParser>,
    pinned: OnceLock<Url>,
}

impl Provider {
    /// Wraps a parser with no endpoint pinned yet.
    pub fn new(parser: Arc<dyn SiteParser>) -> Self {
        Self {
            parser,
            pinned: OnceLock::new(),
        }
    }

    /// Display name of this provider.
    pub fn name(&self) -> &str {
        &self.parser.descriptor().name
    }

    /// Mirrors in probe order.
    pub fn candidate_endpoints(&self) -> &[Url] {
        &self.parser.descriptor().candidate_endpoints
    }

    /// Endpoint chosen by the mirror resolver, if any.
    pub fn pinned_endpoint(&self) -> Option<&Url> {
        self.pinned.get()
    }

    /// True once a mirror has been pinned.
    pub fn is_available(&self) -> bool {
        self.pinned.get().is_some()
    }

    /// Pins `endpoint`. Returns false if another endpoint was pinned first.
    pub(crate) fn pin(&self, endpoint: Url) -> bool {
        self.pinned.set(endpoint).is_ok()
    }

    /// Search URL for `term` on `page` against the pinned endpoint.
    pub fn build_query_url(&self, term: &str, page: u32) -> Option<String> {
        let base = self.pinned.get()?;
        self.parser.build_query_url(base, term, page)
    }

    /// Latest-uploads URL for `page` against the pinned endpoint.
    pub fn build_latest_url(&self, page: u32) -> Option<String> {
        let base = self.pinned.get()?;
        self.parser.build_latest_url(base, page)
    }

    /// Extracts rows and stamps them with this provider's name.
    pub fn extract_results(&self, body: &[u8], term: &str) -> Vec<RawResult> {
        let Some(base) = self.pinned.get() else {
            return Vec::new();
        };

        let mut results = self.parser.extract_results(base, body, term);
        for result in &mut results {
            if result.site_name != self.name() {
                result.site_name = self.name().to_string();
            }
        }
        results
    }

    /// Magnet lookup for a row that had none inline.
    pub async fn resolve_magnet(&self, http: &HttpClient, detail_url: &str) -> Option<String> {
        self.parser
            .resolve_magnet(http, detail_url)
            .await
            .filter(|magnet| magnet::is_magnet_link(magnet))
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name())
            .field("pinned", &self.pinned.get().map(Url::as_str))
            .finish()
    }
}
