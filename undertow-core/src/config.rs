//! Centralized configuration for Undertow.
//!
//! All tunable parameters live here to avoid hard-coded timeouts and pool
//! sizes scattered through the fetch code.

use std::time::Duration;

use crate::errors::AggregateError;

/// Largest page budget a query may request.
pub const MAX_PAGE_BUDGET: u32 = 10;

/// Central configuration for all Undertow components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct UndertowConfig {
    pub network: NetworkConfig,
    pub fetch: FetchConfig,
}

/// HTTP behaviour for mirror probes and page requests.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Hard ceiling for a single mirror liveness probe
    pub probe_timeout: Duration,
    /// Hard ceiling for a single page or detail-page request
    pub page_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
    /// Redirects followed before a request fails
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(15),
            user_agent: concat!("undertow/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
        }
    }
}

/// Pagination and worker pool limits.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Upper bound accepted for a query's page budget
    pub max_page_budget: u32,
    /// Concurrent provider tasks in parallel mode
    pub max_workers: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_page_budget: MAX_PAGE_BUDGET,
            max_workers: num_cpus::get().max(1),
        }
    }
}

impl UndertowConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Reads `UNDERTOW_PROBE_TIMEOUT` and `UNDERTOW_PAGE_TIMEOUT` (seconds)
    /// and `UNDERTOW_MAX_WORKERS`. Unparsable values keep the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("UNDERTOW_PROBE_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.network.probe_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(timeout) = std::env::var("UNDERTOW_PAGE_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.network.page_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(workers) = std::env::var("UNDERTOW_MAX_WORKERS") {
            if let Ok(count) = workers.parse::<usize>() {
                config.fetch.max_workers = count.max(1);
            }
        }

        config
    }

    /// Rejects values that would make every request or query fail.
    ///
    /// # Errors
    ///
    /// - `AggregateError::Configuration` - Zero timeout, page budget or worker count
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.network.probe_timeout.is_zero() || self.network.page_timeout.is_zero() {
            return Err(AggregateError::Configuration {
                reason: "request timeouts must be greater than zero".to_string(),
            });
        }
        if self.fetch.max_page_budget == 0 {
            return Err(AggregateError::Configuration {
                reason: "maximum page budget must be at least 1".to_string(),
            });
        }
        if self.fetch.max_workers == 0 {
            return Err(AggregateError::Configuration {
                reason: "worker pool needs at least one worker".to_string(),
            });
        }
        Ok(())
    }

    /// Creates a configuration with short timeouts for tests against local servers.
    pub fn for_testing() -> Self {
        Self {
            network: NetworkConfig {
                probe_timeout: Duration::from_secs(2),
                page_timeout: Duration::from_secs(2),
                ..Default::default()
            },
            fetch: FetchConfig {
                max_page_budget: MAX_PAGE_BUDGET,
                max_workers: 4,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = UndertowConfig::default();

        assert_eq!(config.network.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.network.page_timeout, Duration::from_secs(15));
        assert_eq!(config.fetch.max_page_budget, 10);
        assert!(config.fetch.max_workers >= 1);
        assert!(config.network.user_agent.starts_with("undertow/"));
    }

    #[test]
    fn test_testing_preset() {
        let config = UndertowConfig::for_testing();

        assert!(config.network.page_timeout < Duration::from_secs(15));
        assert_eq!(config.fetch.max_workers, 4);
    }

    #[test]
    fn test_validate() {
        assert!(UndertowConfig::default().validate().is_ok());

        let mut config = UndertowConfig::for_testing();
        config.fetch.max_workers = 0;
        assert!(matches!(
            config.validate(),
            Err(AggregateError::Configuration { .. })
        ));

        let mut config = UndertowConfig::for_testing();
        config.network.page_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("UNDERTOW_PROBE_TIMEOUT", "3");
            std::env::set_var("UNDERTOW_PAGE_TIMEOUT", "not-a-number");
            std::env::set_var("UNDERTOW_MAX_WORKERS", "7");
        }

        let config = UndertowConfig::from_env();

        assert_eq!(config.network.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.network.page_timeout, Duration::from_secs(15));
        assert_eq!(config.fetch.max_workers, 7);

        unsafe {
            std::env::remove_var("UNDERTOW_PROBE_TIMEOUT");
            std::env::remove_var("UNDERTOW_PAGE_TIMEOUT");
            std::env::remove_var("UNDERTOW_MAX_WORKERS");
        }
    }
}
