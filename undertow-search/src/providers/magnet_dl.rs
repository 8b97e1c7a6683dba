//! MagnetDL.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;
use crate::table::TableLayout;

const LAYOUT: TableLayout = TableLayout {
    magnet: Some(0),
    date: Some(2),
    size: Some(3),
    seeds: Some(4),
    leeches: Some(5),
    name_link: "a[href]:not([href^=\"magnet:\"])",
    ..TableLayout::new("table.download", 7, 0)
};

/// MagnetDL listing, bucketed by the term's first letter.
#[derive(Debug)]
pub struct MagnetDl {
    descriptor: ProviderDescriptor,
}

impl MagnetDl {
    /// Display name.
    pub const NAME: &'static str = "MagnetDL";

    const MIRRORS: [&'static str; 2] = ["https://www.magnetdl.com", "https://magnetdl.unblockit.boo"];

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

impl Default for MagnetDl {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for MagnetDl {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        let bucket: String = term
            .chars()
            .next()
            .map_or_else(|| "a".to_string(), |c| c.to_lowercase().collect());
        Some(format!(
            "{}/{}/{}/?page={}",
            html::root(base),
            html::encode(&bucket),
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
    fn test_query_url_uses_first_letter() {
        let base = Url::parse("https://www.magnetdl.com").unwrap();
        let magnet_dl = MagnetDl::new();

        assert_eq!(
            magnet_dl.build_query_url(&base, "Ubuntu", 0).as_deref(),
            Some("https://www.magnetdl.com/u/Ubuntu/?page=1")
        );
        assert_eq!(
            magnet_dl.build_latest_url(&base, 1).as_deref(),
            Some("https://www.magnetdl.com/a//?page=2")
        );
    }

    #[test]
    fn test_extract_prefers_title_link_over_magnet() {
        let body = br#"
            <table class="download">
              <thead><tr><th>M</th><th>Name</th><th>Age</th><th>Size</th><th>SE</th><th>LE</th><th>Type</th></tr></thead>
              <tbody><tr>
                <td><a href="magnet:?xt=urn:btih:mdl"></a><a href="/file/1/ubuntu/" title="Ubuntu">Ubuntu 24.04 Desktop</a></td>
                <td>x</td><td>4 months</td><td>5.68 GB</td><td>41</td><td>2</td><td>Software</td>
              </tr></tbody>
            </table>
        "#;
        let base = Url::parse("https://www.magnetdl.com").unwrap();

        let results = MagnetDl::new().extract_results(&base, body, "ubuntu");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Ubuntu 24.04 Desktop");
        assert_eq!(results[0].magnet.as_deref(), Some("magnet:?xt=urn:btih:mdl"));
        assert_eq!(results[0].size_text, "5.68 GB");
        assert_eq!(results[0].date_text, "4 months");
    }
}
