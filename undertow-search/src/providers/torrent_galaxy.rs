//! TorrentGalaxy.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;
use crate::table::TableLayout;

const LAYOUT: TableLayout = TableLayout {
    rows: "tr.tgxtablerow",
    header_row: false,
    date: Some(4),
    size: Some(5),
    seeds: Some(7),
    leeches: Some(8),
    ..TableLayout::new("table.tgxtable", 10, 1)
};

/// TorrentGalaxy listing.
#[derive(Debug)]
pub struct TorrentGalaxy {
    descriptor: ProviderDescriptor,
}

impl TorrentGalaxy {
    /// Display name.
    pub const NAME: &'static str = "TorrentGalaxy";

    const MIRRORS: [&'static str; 2] = ["https://torrentgalaxy.to", "https://tgx.rs"];

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

impl Default for TorrentGalaxy {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for TorrentGalaxy {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        Some(format!(
            "{}/torrents.php?search={}&page={}",
            html::root(base),
            html::encode(term),
            page + 1
        ))
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        LAYOUT.extract(Self::NAME, base, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let base = Url::parse("https://tgx.rs").unwrap();
        assert_eq!(
            TorrentGalaxy::new().build_query_url(&base, "dune", 1).as_deref(),
            Some("https://tgx.rs/torrents.php?search=dune&page=2")
        );
    }
}
