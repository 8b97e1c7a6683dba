//! Undertow Core - multi-provider torrent search aggregation
//!
//! This crate holds the engine shared by every front end: mirror failover,
//! sequential and concurrent fetch strategies with per-provider stop rules,
//! result normalization and the post-fetch filter pipeline. Concrete site
//! parsers live in `undertow-search` and plug in through [`SiteParser`].

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod filter;
pub mod http;
pub mod magnet;
pub mod mirror;
pub mod normalize;
pub mod provider;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use aggregator::{AggregateReport, Aggregator};
pub use config::UndertowConfig;
pub use errors::{AggregateError, FetchError};
pub use fetch::{
    FetchMode, NoProgress, ProgressObserver, ProviderOutcome, Query, StopReason, collect_results,
};
pub use filter::{FilterBounds, filter};
pub use http::HttpClient;
pub use mirror::{MirrorResolver, ProbeStatus, WorkingSet};
pub use normalize::{CanonicalResult, DisplayRow, ExportRecord, normalize, parse_size, project};
pub use provider::{NOT_PROVIDED, Provider, ProviderDescriptor, RawResult, SiteParser};

pub type Result<T> = std::result::Result<T, AggregateError>;
