//! 1337x.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;

/// 1337x search listing. Magnets only live on detail pages.
#[derive(Debug)]
pub struct X1337 {
    descriptor: ProviderDescriptor,
}

impl X1337 {
    /// Display name.
    pub const NAME: &'static str = "1337x";

    const MIRRORS: [&'static str; 6] = [
        "https://1337x.to",
        "https://1337x.st",
        "https://x1337x.ws",
        "https://1337x.gd",
        "https://1337x.is",
        "https://1337x.unblockit.boo",
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

impl Default for X1337 {
    fn default() -> Self {
        Self::new()
    }
}

/// The size cell also holds the uploader's seed count (`"1.4 GB12"`);
/// keep everything up to the unit.
fn clean_size(text: &str) -> String {
    match text.find('B') {
        Some(end) => text[..=end].to_string(),
        None => text.to_string(),
    }
}

impl SiteParser for X1337 {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        Some(format!(
            "{}/search/{}/{}/",
            html::root(base),
            html::encode(term),
            page + 1
        ))
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        let document = html::document(body);
        let Some(table) = html::first(document.root_element(), "table.table-list") else {
            return Vec::new();
        };

        html::all(table, "tr")
            .into_iter()
            .skip(1)
            .filter_map(|row| {
                // First link is the category icon, second the title.
                let name_cell = html::first(row, "td.name")?;
                let link = *html::all(name_cell, "a[href]").get(1)?;

                Some(
                    RawResult::new(Self::NAME, html::text_of(link))
                        .with_size(clean_size(&html::text_at(row, "td.size")))
                        .with_peers(html::text_at(row, "td.seeds"), html::text_at(row, "td.leeches"))
                        .with_date(html::text_at(row, "td.coll-date"))
                        .with_detail_url(html::absolute_href(base, link)),
                )
            })
            .collect()
    }
}
