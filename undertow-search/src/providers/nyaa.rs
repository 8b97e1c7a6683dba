//! Nyaa anime tracker.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;
use crate::table::TableLayout;

const LAYOUT: TableLayout = TableLayout {
    name_link: "a[href]:not(.comments)",
    magnet: Some(2),
    size: Some(3),
    date: Some(4),
    seeds: Some(5),
    leeches: Some(6),
    ..TableLayout::new("table.torrent-list, table.table", 7, 1)
};

/// Nyaa torrent list; magnets are inline in the link column.
#[derive(Debug)]
pub struct Nyaa {
    descriptor: ProviderDescriptor,
}

impl Nyaa {
    /// Display name.
    pub const NAME: &'static str = "Nyaa";

    const MIRRORS: [&'static str; 2] = ["https://nyaa.si", "https://nyaa.net"];

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

impl Default for Nyaa {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for Nyaa {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        Some(format!(
            "{}/?f=0&c=0_0&q={}&p={}",
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
    fn test_extract_inline_magnet() {
        let body = br#"
            <table class="table torrent-list">
              <thead><tr><th>Category</th><th>Name</th><th>Link</th><th>Size</th><th>Date</th><th>S</th><th>L</th><th>C</th></tr></thead>
              <tbody>
                <tr class="success">
                  <td><a href="/?c=1_2">Anime</a></td>
                  <td colspan="2">
                    <a href="/view/1#comments" class="comments">3</a>
                    <a href="/view/1" title="[Group] Show - 01">[Group] Show - 01</a>
                  </td>
                  <td><a href="/download/1.torrent">t</a><a href="magnet:?xt=urn:btih:nyaa1">m</a></td>
                  <td>1.4 GiB</td>
                  <td>2024-03-01 12:00</td>
                  <td>250</td>
                  <td>9</td>
                  <td>1200</td>
                </tr>
              </tbody>
            </table>
        "#;
        let base = Url::parse("https://nyaa.si").unwrap();

        let results = Nyaa::new().extract_results(&base, body, "show");

        assert_eq!(results.len(), 1);
        let row = &results[0];
        assert_eq!(row.name, "[Group] Show - 01");
        assert_eq!(row.detail_url.as_deref(), Some("https://nyaa.si/view/1"));
        assert_eq!(row.magnet.as_deref(), Some("magnet:?xt=urn:btih:nyaa1"));
        assert_eq!(row.size_text, "1.4 GiB");
        assert_eq!(row.date_text, "2024-03-01 12:00");
        assert_eq!(row.seeds_text, "250");
        assert_eq!(row.leeches_text, "9");
    }

    #[test]
    fn test_query_url() {
        let base = Url::parse("https://nyaa.si").unwrap();
        assert_eq!(
            Nyaa::new().build_query_url(&base, "show", 0).as_deref(),
            Some("https://nyaa.si/?f=0&c=0_0&q=show&p=1")
        );
    }
}
