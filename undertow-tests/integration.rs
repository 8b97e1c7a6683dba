//! Integration tests for Undertow
//!
//! These tests run the engine against local mock sites and check mirror
//! pinning, pagination stop rules, fetch strategies and the full run.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/aggregator_scenario.rs"]
mod aggregator_scenario;
#[path = "integration/concurrent_fetch.rs"]
mod concurrent_fetch;
#[path = "integration/latest_mode.rs"]
mod latest_mode;
#[path = "integration/mirror_resolution.rs"]
mod mirror_resolution;
#[path = "integration/search_providers.rs"]
mod search_providers;
#[path = "integration/sequential_fetch.rs"]
mod sequential_fetch;
