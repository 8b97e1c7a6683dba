//! Bitsearch.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;

/// Bitsearch result cards. No upload date is listed.
#[derive(Debug)]
pub struct Bitsearch {
    descriptor: ProviderDescriptor,
}

impl Bitsearch {
    /// Display name.
    pub const NAME: &'static str = "Bitsearch";

    const MIRRORS: [&'static str; 1] = ["https://bitsearch.to"];

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

impl Default for Bitsearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for Bitsearch {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        Some(format!(
            "{}/search?q={}&page={}",
            html::root(base),
            html::encode(term),
            page + 1
        ))
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        let document = html::document(body);

        html::all(document.root_element(), ".search-results .result")
            .into_iter()
            .filter_map(|card| {
                let link = html::first(card, "a.name")?;
                Some(
                    RawResult::new(Self::NAME, html::text_of(link))
                        .with_size(html::text_at(card, "span.size"))
                        .with_peers(html::text_at(card, "span.seeds"), html::text_at(card, "span.leeches"))
                        .with_magnet(html::inline_magnet(card))
                        .with_detail_url(html::absolute_href(base, link)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use undertow_core::NOT_PROVIDED;

    use super::*;

    #[test]
    fn test_extract_cards() {
        let body = br#"
            <div class="search-results">
              <li class="result">
                <h5><a class="name" href="/torrent/abc">Arch Linux 2024.05.01</a></h5>
                <div class="stats"><span class="size">1.1 GB</span><span class="seeds">90</span><span class="leeches">1</span></div>
              </li>
              <li class="result"><span class="size">no title</span></li>
            </div>
        "#;
        let base = Url::parse("https://bitsearch.to").unwrap();

        let results = Bitsearch::new().extract_results(&base, body, "arch");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Arch Linux 2024.05.01");
        assert_eq!(results[0].seeds_text, "90");
        assert_eq!(results[0].date_text, NOT_PROVIDED);
        assert_eq!(
            results[0].detail_url.as_deref(),
            Some("https://bitsearch.to/torrent/abc")
        );
    }
}
