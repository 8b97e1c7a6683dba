//! DOM helpers shared by the site parsers.

use scraper::{ElementRef, Html, Selector};
use undertow_core::NOT_PROVIDED;
use undertow_core::magnet::is_magnet_link;
use url::Url;

/// Parses a response body as an HTML document, replacing invalid UTF-8.
pub(crate) fn document(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

/// Compiles a CSS selector. An invalid selector is logged and matches nothing.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(css, error = %e, "invalid selector");
            None
        }
    }
}

/// First descendant of `scope` matching `css`.
pub(crate) fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    scope.select(&selector).next()
}

/// Every descendant of `scope` matching `css`, in document order.
pub(crate) fn all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Visible text with whitespace collapsed; the sentinel when empty.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    let text = element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        text
    }
}

/// Text of the first match of `css` inside `scope`, or the sentinel.
pub(crate) fn text_at(scope: ElementRef<'_>, css: &str) -> String {
    first(scope, css).map_or_else(|| NOT_PROVIDED.to_string(), text_of)
}

/// `href` of `element` resolved against `base`.
pub(crate) fn absolute_href(base: &Url, element: ElementRef<'_>) -> Option<String> {
    let href = element.value().attr("href")?;
    base.join(href).ok().map(String::from)
}

/// First inline magnet link anywhere inside `scope`.
pub(crate) fn inline_magnet(scope: ElementRef<'_>) -> Option<String> {
    all(scope, "a[href]")
        .into_iter()
        .filter_map(|link| link.value().attr("href"))
        .find(|href| is_magnet_link(href))
        .map(str::to_string)
}

/// Percent-encodes a search term for use in a path or query string.
pub(crate) fn encode(term: &str) -> String {
    urlencoding::encode(term).into_owned()
}

/// Endpoint without its trailing slash, ready for `format!` concatenation.
pub(crate) fn root(base: &Url) -> &str {
    base.as_str().trim_end_matches('/')
}
