//! RARBG archive mirrors.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

/// RARBG shut down; its mirrors still answer probes but serve no search.
///
/// Every page URL is absent, so the fetch loop skips this provider on its
/// first page.
#[derive(Debug)]
pub struct Rarbg {
    descriptor: ProviderDescriptor,
}

impl Rarbg {
    /// Display name.
    pub const NAME: &'static str = "RARBG";

    const MIRRORS: [&'static str; 2] = ["https://rarbgmirror.com", "https://rarbgprx.org"];

    /// Parser probing the public mirror list.
    pub fn new() -> Self {
        Self {
            descriptor: ProviderDescriptor::from_mirrors(Self::NAME, &Self::MIRRORS),
        }
    }

    /// Parser probing `mirrors` instead of the public list.
    pub fn with_mirrors(mirrors: Vec<Url>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(Self::NAME, mirrors),
        }
    }
}

impl Default for Rarbg {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for Rarbg {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, _base: &Url, _term: &str, _page: u32) -> Option<String> {
        None
    }

    fn extract_results(&self, _base: &Url, _body: &[u8], _term: &str) -> Vec<RawResult> {
        tracing::warn!("RARBG is closed; archive mirrors only, no search");
        Vec::new()
    }
}
