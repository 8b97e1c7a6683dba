//! Magnet link shape checks and the default detail-page lookup.
//!
//! Only the string shape is checked. Nothing here talks to trackers or
//! validates info hashes.

use std::sync::LazyLock;

use regex::Regex;

use crate::http::HttpClient;

static MAGNET_HREF: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["'](magnet:[^"']+)["']"#).ok()
});

/// True if `candidate` looks like a magnet URI.
pub fn is_magnet_link(candidate: &str) -> bool {
    candidate
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
        && candidate.len() > 7
}

/// First `href` in `html` that points at a magnet URI.
pub fn find_magnet_in_html(html: &str) -> Option<String> {
    let pattern = MAGNET_HREF.as_ref()?;
    pattern
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().replace("&amp;", "&"))
        .find(|magnet| is_magnet_link(magnet))
}

/// Fetches a detail page and returns its first magnet link.
///
/// Any failure yields `None`; the row is kept without a magnet.
pub async fn resolve_from_detail_page(http: &HttpClient, detail_url: &str) -> Option<String> {
    match http.get_text(detail_url).await {
        Ok(html) => {
            let magnet = find_magnet_in_html(&html);
            if magnet.is_none() {
                tracing::debug!(detail_url, "detail page has no magnet link");
            }
            magnet
        }
        Err(e) => {
            tracing::debug!(detail_url, error = %e, "magnet lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnet_shape() {
        assert!(is_magnet_link("magnet:?xt=urn:btih:0123456789abcdef"));
        assert!(is_magnet_link("MAGNET:?xt=urn:btih:abc"));
        assert!(!is_magnet_link("magnet:"));
        assert!(!is_magnet_link("https://example.org/file.torrent"));
        assert!(!is_magnet_link(""));
        assert!(!is_magnet_link("-"));
    }

    #[test]
    fn test_find_magnet_in_html() {
        let html = r#"
            <a href="/download/1.torrent">Torrent</a>
            <a class="btn" href='magnet:?xt=urn:btih:ABCDEF&amp;dn=Some+Name'>Magnet</a>
            <a href="magnet:?xt=urn:btih:SECOND">Second</a>
        "#;

        assert_eq!(
            find_magnet_in_html(html).as_deref(),
            Some("magnet:?xt=urn:btih:ABCDEF&dn=Some+Name")
        );
    }

    #[test]
    fn test_find_magnet_without_link() {
        assert_eq!(find_magnet_in_html("<p>No magnets here</p>"), None);
    }
}
