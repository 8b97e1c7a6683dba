//! LinuxTracker.

use undertow_core::{ProviderDescriptor, RawResult, SiteParser};
use url::Url;

use crate::html;
use crate::table::TableLayout;

const LAYOUT: TableLayout = TableLayout {
    date: Some(3),
    size: Some(4),
    seeds: Some(5),
    leeches: Some(6),
    ..TableLayout::new("table.torrents", 7, 1)
};

/// LinuxTracker distribution listing; a single result page per search.
#[derive(Debug)]
pub struct LinuxTracker {
    descriptor: ProviderDescriptor,
}

impl LinuxTracker {
    /// Display name.
    pub const NAME: &'static str = "LinuxTracker";

    const MIRRORS: [&'static str; 1] = ["https://linuxtracker.org"];

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

impl Default for LinuxTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteParser for LinuxTracker {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_query_url(&self, base: &Url, term: &str, page: u32) -> Option<String> {
        (page == 0).then(|| {
            format!(
                "{}/index.php?page=torrents&search={}",
                html::root(base),
                html::encode(term)
            )
        })
    }

    fn extract_results(&self, base: &Url, body: &[u8], _term: &str) -> Vec<RawResult> {
        LAYOUT.extract(Self::NAME, base, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let base = Url::parse("https://linuxtracker.org").unwrap();
        let tracker = LinuxTracker::new();

        assert_eq!(
            tracker.build_query_url(&base, "fedora", 0).as_deref(),
            Some("https://linuxtracker.org/index.php?page=torrents&search=fedora")
        );
        assert!(tracker.build_query_url(&base, "fedora", 1).is_none());
    }
}
