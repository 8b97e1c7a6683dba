//! The Pirate Bay and its proxies.

use undertow_core::{NOT_PROVIDED, ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;

/// The Pirate Bay search listing.
///
/// Size and upload date share one description line per row
/// (`Uploaded 03-15 2023, Size 1.2 GiB, ULed by someone`).
#[derive(Debug)]
pub struct PirateBay {
    descriptor: ProviderDescriptor,
}

impl PirateBay {
    /// Display name.
    pub const NAME: &'static str = "The Pirate Bay";

    const MIRRORS: [&'static str; 11] = [
        "https://thepiratebay.org",
        "https://tpb.party",
        "https://pirateproxy.live",
        "https://thehiddenbay.com",
        "https://piratebay.live",
        "https://thepiratebay.rocks",
        "https://tpb.pm",
        "https://piratebay.ink",
        "https://piratebayproxy.net",
        "https://thepiratebay10.org",
        "https://thepiratebay3.to",
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

impl Default for PirateBay {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits the description line into `(date, size)`.
fn split_description(description: &str) -> (String, String) {
    let mut parts = description.split(',');
    let mut field = |prefix: &str| {
        parts
            .next()
            .map(|part| part.trim().trim_start_matches(prefix).trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    };
    let date = field("Uploaded");
    let size = field("Size");
    (date, size)
}

impl SiteParser for PirateBay {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        Some(format!(
            "{}/s/?q={}&page={page}&orderby=99",
            html::root(base),
            html::encode(term)
        ))
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        let document = html::document(body);
        let Some(table) = html::first(document.root_element(), "table#searchResult") else {
            return Vec::new();
        };

        html::all(table, "tr")
            .into_iter()
            .skip(1)
            .filter_map(|row| {
                let link = html::first(row, "a.detLink")?;
                let (date, size) = html::first(row, "font.detDesc")
                    .map(|desc| split_description(&html::text_of(desc)))
                    .unwrap_or_else(|| (NOT_PROVIDED.to_string(), NOT_PROVIDED.to_string()));
                let peers: Vec<_> = html::all(row, r#"td[align="right"]"#)
                    .into_iter()
                    .map(html::text_of)
                    .collect();
                let peer = |i: usize| {
                    peers
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| NOT_PROVIDED.to_string())
                };

                Some(
                    RawResult::new(Self::NAME, html::text_of(link))
                        .with_size(size)
                        .with_peers(peer(0), peer(1))
                        .with_date(date)
                        .with_magnet(html::inline_magnet(row))
                        .with_detail_url(html::absolute_href(base, link)),
                )
            })
            .collect()
    }
}
