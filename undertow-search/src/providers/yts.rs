//! YTS movie listings.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;

/// YTS browse pages. Cards carry no size or peer counts; the release year
/// stands in for the date.
#[derive(Debug)]
pub struct Yts {
    descriptor: ProviderDescriptor,
}

impl Yts {
    /// Display name.
    pub const NAME: &'static str = "YTS";

    const MIRRORS: [&'static str; 3] = ["https://yts.mx", "https://yts.rs", "https://yts.lt"];

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

impl Default for Yts {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for Yts {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        let term = if term.is_empty() { "0".to_string() } else { html::encode(term) };
        let url = format!("{}/browse-movies/{term}/all/all/0/latest", html::root(base));
        if page == 0 {
            Some(url)
        } else {
            Some(format!("{url}?page={}", page + 1))
        }
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        let document = html::document(body);

        html::all(document.root_element(), ".browse-movie-wrap")
            .into_iter()
            .filter_map(|card| {
                let title = html::first(card, ".browse-movie-title")?;
                let year = html::text_at(card, ".browse-movie-year");
                let link = html::first(card, "a[href]")?;

                Some(
                    RawResult::new(Self::NAME, format!("{} ({year})", html::text_of(title)))
                        .with_date(year)
                        .with_detail_url(html::absolute_href(base, link)),
                )
            })
            .collect()
    }
}
