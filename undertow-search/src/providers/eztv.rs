//! EZTV TV releases.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;
use crate::table::TableLayout;

const LAYOUT: TableLayout = TableLayout {
    size: Some(3),
    date: Some(4),
    ..TableLayout::new("table.forum_header_border", 5, 1)
};

/// EZTV search. The site has no paging, so only page 0 has a URL, and
/// rows carry no peer counts.
#[derive(Debug)]
pub struct Eztv {
    descriptor: ProviderDescriptor,
}

impl Eztv {
    /// Display name.
    pub const NAME: &'static str = "EZTV";

    const MIRRORS: [&'static str; 3] = [
        "https://eztv.re",
        "https://eztv.wf",
        "https://eztv.unblockit.boo",
    ];

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

impl Default for Eztv {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for Eztv {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        (page == 0).then(|| format!("{}/search/{}", html::root(base), html::encode(term)))
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        LAYOUT.extract(Self::NAME, base, body)
    }
}

#[cfg(test)]
mod tests {
    use undertow_core::NOT_PROVIDED;

    use super::*;

    #[test]
    fn test_single_page_only() {
        let base = Url::parse("https://eztv.re").unwrap();
        let eztv = Eztv::new();

        assert_eq!(
            eztv.build_query_url(&base, "severance", 0).as_deref(),
            Some("https://eztv.re/search/severance")
        );
        assert!(eztv.build_query_url(&base, "severance", 1).is_none());
    }

    #[test]
    fn test_extract_rows_without_peers() {
        let body = br#"
            <table class="forum_header_border">
              <tr><td>Show</td><td>Episode</td><td>DL</td><td>Size</td><td>Released</td></tr>
              <tr class="forum_header_border">
                <td><a href="/shows/1/severance/">S</a></td>
                <td><a href="/ep/2/severance-s02e01/" class="epinfo">Severance S02E01 1080p</a></td>
                <td><a href="/dl/2.torrent">t</a></td>
                <td>2.1 GB</td>
                <td>3 weeks</td>
              </tr>
            </table>
        "#;
        let base = Url::parse("https://eztv.re").unwrap();

        let results = Eztv::new().extract_results(&base, body, "severance");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Severance S02E01 1080p");
        assert_eq!(results[0].size_text, "2.1 GB");
        assert_eq!(results[0].seeds_text, NOT_PROVIDED);
        assert_eq!(
            results[0].detail_url.as_deref(),
            Some("https://eztv.re/ep/2/severance-s02e01/")
        );
    }
}
