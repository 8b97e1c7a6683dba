//! Concrete site parsers and the default registry.

use std::sync::Arc;

use undertow_core::SiteParser;

pub mod bitsearch;
pub mod eztv;
pub mod fitgirl;
pub mod lime_torrents;
pub mod linux_tracker;
pub mod magnet_dl;
pub mod nyaa;
pub mod pirate_bay;
pub mod rarbg;
pub mod torrent_galaxy;
pub mod x1337;
pub mod yts;

pub use bitsearch::Bitsearch;
pub use eztv::Eztv;
pub use fitgirl::FitGirlRepacks;
pub use lime_torrents::LimeTorrents;
pub use linux_tracker::LinuxTracker;
pub use magnet_dl::MagnetDl;
pub use nyaa::Nyaa;
pub use pirate_bay::PirateBay;
pub use rarbg::Rarbg;
pub use torrent_galaxy::TorrentGalaxy;
pub use x1337::X1337;
pub use yts::Yts;

/// Every bundled parser in registry order.
///
/// Order matters: sequential runs visit providers in this order and the
/// results table lists their rows in the same order.
pub fn default_registry() -> Vec<Arc<dyn SiteParser>> {
    vec![
        Arc::new(PirateBay::new()),
        Arc::new(X1337::new()),
        Arc::new(Yts::new()),
        Arc::new(Nyaa::new()),
        Arc::new(Eztv::new()),
        Arc::new(TorrentGalaxy::new()),
        Arc::new(LimeTorrents::new()),
        Arc::new(MagnetDl::new()),
        Arc::new(Bitsearch::new()),
        Arc::new(Rarbg::new()),
        Arc::new(FitGirlRepacks::new()),
        Arc::new(LinuxTracker::new()),
    ]
}

/// Names of the bundled parsers in registry order.
pub fn registry_names() -> Vec<String> {
    default_registry()
        .iter()
        .map(|parser| parser.descriptor().name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        let names = registry_names();
        let unique: HashSet<_> = names.iter().map(|n| n.to_lowercase()).collect();

        assert_eq!(names.len(), 12);
        assert_eq!(unique.len(), names.len());
        assert_eq!(names[0], PirateBay::NAME);
        assert_eq!(names[11], LinuxTracker::NAME);
    }

    #[test]
    fn test_every_parser_has_mirrors() {
        for parser in default_registry() {
            assert!(
                !parser.descriptor().candidate_endpoints.is_empty(),
                "{} has no parsable mirrors",
                parser.descriptor().name
            );
        }
    }
}
