//! Mirror resolution: pin each provider to its first responsive endpoint.

use std::sync::Arc;

use url::Url;

use crate::http::HttpClient;
use crate::provider::Provider;

/// Result of probing one provider's mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStatus {
    pub provider: String,
    /// Pinned endpoint, `None` when every candidate failed
    pub endpoint: Option<Url>,
}

impl ProbeStatus {
    pub fn is_working(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Providers that survived mirror resolution, in registry order.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    pub providers: Vec<Arc<Provider>>,
    pub probes: Vec<ProbeStatus>,
}

impl WorkingSet {
    /// Number of providers that were probed.
    pub fn attempted(&self) -> usize {
        self.probes.len()
    }

    /// Number of providers with a pinned endpoint.
    pub fn available(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Probes candidate endpoints in listed order and pins the first success.
///
/// First success wins: later candidates are never contacted once an earlier
/// one answers 200, however fast or reliable they might be.
#[derive(Debug, Clone)]
pub struct MirrorResolver {
    http: HttpClient,
}

impl MirrorResolver {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Pins `provider` to its first responsive mirror.
    ///
    /// Returns false when no candidate answered; the provider then stays
    /// unpinned and is excluded from the rest of the session. A provider that
    /// is already pinned is not probed again.
    pub async fn resolve(&self, provider: &Provider) -> bool {
        if provider.is_available() {
            return true;
        }

        for endpoint in provider.candidate_endpoints() {
            tracing::debug!(provider = provider.name(), %endpoint, "probing mirror");

            match self.http.probe(endpoint).await {
                Ok(()) => {
                    tracing::info!(provider = provider.name(), %endpoint, "pinned mirror");
                    provider.pin(endpoint.clone());
                    return true;
                }
                Err(e) => {
                    tracing::debug!(provider = provider.name(), %endpoint, error = %e, "mirror failed");
                }
            }
        }

        tracing::warn!(
            provider = provider.name(),
            candidates = provider.candidate_endpoints().len(),
            "no responsive mirror"
        );
        false
    }

    /// Resolves every provider and returns those that pinned a mirror.
    ///
    /// Providers are probed concurrently; each provider's own candidates are
    /// still tried strictly in order. The working set keeps registry order.
    pub async fn resolve_all(&self, providers: &[Arc<Provider>]) -> WorkingSet {
        let outcomes =
            futures::future::join_all(providers.iter().map(|provider| self.resolve(provider)))
                .await;

        let mut working = WorkingSet::default();
        for (provider, resolved) in providers.iter().zip(outcomes) {
            working.probes.push(ProbeStatus {
                provider: provider.name().to_string(),
                endpoint: provider.pinned_endpoint().cloned(),
            });
            if resolved {
                working.providers.push(Arc::clone(provider));
            }
        }

        tracing::info!(
            attempted = working.attempted(),
            available = working.available(),
            "mirror resolution finished"
        );

        working
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_working_set() {
        let working = WorkingSet::default();
        assert!(working.is_empty());
        assert_eq!(working.attempted(), 0);
        assert_eq!(working.available(), 0);
    }

    #[test]
    fn test_probe_status() {
        let status = ProbeStatus {
            provider: "Nyaa".to_string(),
            endpoint: Url::parse("https://nyaa.si").ok(),
        };
        assert!(status.is_working());

        let failed = ProbeStatus {
            provider: "RARBG".to_string(),
            endpoint: None,
        };
        assert!(!failed.is_working());
    }
}
