//! Error types for aggregation runs and individual page requests.

use thiserror::Error;

/// Run-level failures surfaced to the caller.
///
/// Only these abort an aggregation run. Everything that goes wrong inside a
/// single provider is reported through [`FetchError`] and swallowed at that
/// provider's scope.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// No provider answered on any of its mirrors.
    #[error("No working providers available ({attempted} attempted)")]
    TotalUnavailability {
        /// Number of providers that were probed
        attempted: usize,
    },

    /// The provider allow-list did not match any registered provider.
    #[error("No providers match the selection: {}", requested.join(", "))]
    NoMatchingProviders {
        /// Names the caller asked for
        requested: Vec<String>,
    },

    /// Query parameters were rejected before any network activity.
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Why the query was rejected
        reason: String,
    },

    /// Configuration values could not be used.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Why the configuration was rejected
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {reason}")]
    HttpClient {
        /// Underlying client builder failure
        reason: String,
    },
}

impl AggregateError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AggregateError::TotalUnavailability { .. } => {
                "No working torrent sites available. Please check your internet connection or try using a VPN."
                    .to_string()
            }
            AggregateError::NoMatchingProviders { .. } => {
                "No matching sites found for your selection.".to_string()
            }
            AggregateError::InvalidQuery { reason } => reason.clone(),
            AggregateError::Configuration { .. } => "Configuration error occurred".to_string(),
            AggregateError::HttpClient { .. } => "Could not initialise the HTTP client".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AggregateError::NoMatchingProviders { .. } | AggregateError::InvalidQuery { .. }
        )
    }
}

/// Failure of a single HTTP request made on behalf of one provider.
///
/// Never propagates past the provider whose request failed; the fetch loop
/// records it in a [`crate::fetch::StopReason`] and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider produced no URL, or one that is not absolute HTTP(S).
    #[error("Malformed URL: {}", url.as_deref().unwrap_or("<none>"))]
    MalformedUrl {
        /// The rejected URL, if the provider produced one
        url: Option<String>,
    },

    /// The request did not finish within its timeout.
    #[error("Request timed out: {url}")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// Connection could not be established or was dropped.
    #[error("Connection failed for {url}: {reason}")]
    Connection {
        /// Requested URL
        url: String,
        /// Transport error description
        reason: String,
    },

    /// The server answered with something other than 200.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The response body could not be read.
    #[error("Failed to read body from {url}: {reason}")]
    Body {
        /// Requested URL
        url: String,
        /// Read error description
        reason: String,
    },
}

impl FetchError {
    /// Status codes treated as "this source refuses us".
    pub const REFUSAL_STATUSES: [u16; 3] = [403, 404, 500];

    /// True for 403, 404 and 500 responses.
    pub fn is_refusal(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if Self::REFUSAL_STATUSES.contains(status))
    }

    /// Short label used in progress output.
    pub fn short_label(&self) -> String {
        match self {
            FetchError::MalformedUrl { .. } => "Skipped".to_string(),
            FetchError::Timeout { .. } => "Timeout".to_string(),
            FetchError::Connection { .. } => "ConnErr".to_string(),
            FetchError::Status { status, .. } => status.to_string(),
            FetchError::Body { .. } => "Error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_statuses() {
        for status in [403, 404, 500] {
            let error = FetchError::Status {
                url: "https://example.org".to_string(),
                status,
            };
            assert!(error.is_refusal(), "{status} should be a refusal");
        }

        let other = FetchError::Status {
            url: "https://example.org".to_string(),
            status: 502,
        };
        assert!(!other.is_refusal());
        assert!(
            !FetchError::Timeout {
                url: "https://example.org".to_string()
            }
            .is_refusal()
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(
            AggregateError::InvalidQuery {
                reason: "bad".to_string()
            }
            .is_user_error()
        );
        assert!(!AggregateError::TotalUnavailability { attempted: 3 }.is_user_error());
    }

    #[test]
    fn test_short_labels() {
        let malformed = FetchError::MalformedUrl { url: None };
        assert_eq!(malformed.short_label(), "Skipped");
        assert_eq!(malformed.to_string(), "Malformed URL: <none>");

        let status = FetchError::Status {
            url: "https://example.org".to_string(),
            status: 429,
        };
        assert_eq!(status.short_label(), "429");
    }
}
