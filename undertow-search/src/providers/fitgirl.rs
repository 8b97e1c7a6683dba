//! FitGirl Repacks.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;

/// FitGirl Repacks blog search. One post per release; the magnet is on the
/// post page.
#[derive(Debug)]
pub struct FitGirlRepacks {
    descriptor: ProviderDescriptor,
}

impl FitGirlRepacks {
    /// Display name.
    pub const NAME: &'static str = "FitGirl Repacks";

    const MIRRORS: [&'static str; 1] = ["https://fitgirl-repacks.site"];

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

impl Default for FitGirlRepacks {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for FitGirlRepacks {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        (page == 0).then(|| format!("{}/?s={}", html::root(base), html::encode(term)))
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        let document = html::document(body);

        html::all(document.root_element(), ".post")
            .into_iter()
            .filter_map(|post| {
                let title = html::first(post, "h1.post-title")?;
                let link = html::first(post, "a[href]")?;
                Some(
                    RawResult::new(Self::NAME, html::text_of(title))
                        .with_detail_url(html::absolute_href(base, link)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_posts() {
        let body = r#"
            <article class="post">
              <header><h1 class="post-title"><a href="https://fitgirl-repacks.site/some-game/">Some Game – v1.2</a></h1></header>
            </article>
            <article class="post"><p>no heading</p></article>
        "#
        .as_bytes();
        let base = Url::parse("https://fitgirl-repacks.site").unwrap();

        let results = FitGirlRepacks::new().extract_results(&base, body, "some game");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Some Game – v1.2");
        assert!(results[0].needs_magnet());
    }
}
