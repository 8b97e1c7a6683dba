//! LimeTorrents.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;
use crate::table::TableLayout;

const LAYOUT: TableLayout = TableLayout {
    size: Some(1),
    date: Some(2),
    seeds: Some(3),
    leeches: Some(4),
    ..TableLayout::new("table#table2", 6, 0)
};

/// LimeTorrents search, ordered by seeds.
#[derive(Debug)]
pub struct LimeTorrents {
    descriptor: ProviderDescriptor,
}

impl LimeTorrents {
    /// Display name.
    pub const NAME: &'static str = "LimeTorrents";

    const MIRRORS: [&'static str; 4] = [
        "https://www.limetorrents.lol",
        "https://www.limetorrents.pro",
        "https://www.limetorrents.cyou",
        "https://www.limetorrents.zone",
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

impl Default for LimeTorrents {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for LimeTorrents {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        Some(format!(
            "{}/search/all/{}/seeds/{}/",
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
    fn test_extract() {
        let body = br#"
            <table id="table2">
              <tr><th>Name</th><th>Size</th><th>Added</th><th>Seed</th><th>Leech</th><th>Health</th></tr>
              <tr>
                <td><div class="tt-name"><a href="/Debian-12-torrent-1.html">Debian 12 netinst</a></div></td>
                <td>628 MB</td><td>2 days ago</td><td>77</td><td>3</td><td><div class="health"></div></td>
              </tr>
            </table>
        "#;
        let base = Url::parse("https://www.limetorrents.lol").unwrap();

        let results = LimeTorrents::new().extract_results(&base, body, "debian");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Debian 12 netinst");
        assert_eq!(results[0].size_text, "628 MB");
        assert_eq!(results[0].seeds_text, "77");
        assert_eq!(results[0].leeches_text, "3");
    }
}
