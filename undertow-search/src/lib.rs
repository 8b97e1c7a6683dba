//! Undertow Search - torrent site parsers
//!
//! Each parser implements [`undertow_core::SiteParser`] for one public
//! torrent index: how to build search and latest-upload URLs against a
//! pinned mirror and how to pull listing rows out of the returned HTML.

#![deny(missing_docs)]

mod html;
pub mod providers;
mod table;

pub use providers::{default_registry, registry_names};
