//! HTTP transport shared by mirror probes, page fetches and magnet lookups.

use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::config::NetworkConfig;
use crate::errors::{AggregateError, FetchError};

/// HTTP client pair with separate timeouts for probes and page requests.
///
/// Timeouts are hard per-call ceilings; nothing here retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    probe: reqwest::Client,
    page: reqwest::Client,
}

impl HttpClient {
    /// Creates clients from network configuration.
    ///
    /// # Errors
    ///
    /// - `AggregateError::HttpClient` - If the TLS backend or client builder fails
    pub fn new(config: &NetworkConfig) -> Result<Self, AggregateError> {
        let build = |timeout: Duration| {
            reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(config.user_agent.as_str())
                .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
                .build()
                .map_err(|e| AggregateError::HttpClient {
                    reason: e.to_string(),
                })
        };

        Ok(Self {
            probe: build(config.probe_timeout)?,
            page: build(config.page_timeout)?,
        })
    }

    /// Liveness probe against a mirror root. Only a 200 counts as alive.
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` - Probe exceeded the probe timeout
    /// - `FetchError::Connection` - Mirror could not be reached
    /// - `FetchError::Status` - Mirror answered with a non-200 status
    pub async fn probe(&self, endpoint: &Url) -> Result<(), FetchError> {
        let url = endpoint.as_str();
        let response = self
            .probe
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|e| classify(url, &e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    /// Fetches one page and returns its body.
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` - Request or body read exceeded the page timeout
    /// - `FetchError::Connection` - Host unreachable or connection dropped
    /// - `FetchError::Status` - Any status other than 200
    /// - `FetchError::Body` - Body could not be read
    pub async fn get_page(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url, "fetching page");

        let response = self
            .page
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        Ok(body.to_vec())
    }

    /// Fetches one page as text, replacing invalid UTF-8.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get_page`].
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let body = self.get_page(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn classify(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

/// Accepts only absolute `http`/`https` URLs with a host.
///
/// # Errors
///
/// - `FetchError::MalformedUrl` - Missing, empty, relative or non-HTTP URL
pub fn validate_page_url(candidate: Option<String>) -> Result<String, FetchError> {
    let Some(candidate) = candidate else {
        return Err(FetchError::MalformedUrl { url: None });
    };

    match Url::parse(&candidate) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() =>
        {
            Ok(candidate)
        }
        _ => Err(FetchError::MalformedUrl {
            url: Some(candidate),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page_url() {
        assert!(validate_page_url(Some("https://example.org/s?q=a".to_string())).is_ok());
        assert!(validate_page_url(Some("http://127.0.0.1:8080/x".to_string())).is_ok());

        for rejected in ["", "/relative/path", "ftp://example.org/file", "magnet:?xt=urn:btih:abc"] {
            let result = validate_page_url(Some(rejected.to_string()));
            assert_eq!(
                result,
                Err(FetchError::MalformedUrl {
                    url: Some(rejected.to_string())
                }),
                "{rejected:?} should be rejected"
            );
        }

        assert_eq!(
            validate_page_url(None),
            Err(FetchError::MalformedUrl { url: None })
        );
    }

    #[test]
    fn test_client_builds_from_default_config() {
        let client = HttpClient::new(&NetworkConfig::default());
        assert!(client.is_ok());
    }
}
