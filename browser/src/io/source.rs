//! Data source contract for loading one catalog page at a time.

use thiserror::Error;

use crate::core::pagination::PageWindow;
use crate::core::types::ArtworksPage;

/// Failures while loading a page.
///
/// `Cancelled` marks a request that was superseded by newer navigation. It is
/// never shown to the user; every other variant is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error: {status} {reason}")]
    Api { status: u16, reason: String },

    /// The body did not match the expected response shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The configured endpoint could not be turned into a request URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// Superseded by a newer request.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// HTTP status of the failure; 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            Self::Network(_) | Self::Decode(_) | Self::InvalidUrl(_) | Self::Cancelled => 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether trying the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::InvalidUrl(_) | Self::Cancelled => false,
        }
    }

    /// Message suitable for display next to the table.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error while fetching artworks.".to_string(),
            Self::Api { status, reason } => format!("API error: {status} {reason}"),
            Self::Decode(_) => "Unexpected response while fetching artworks.".to_string(),
            Self::InvalidUrl(_) => "The catalog endpoint is misconfigured.".to_string(),
            Self::Cancelled => String::new(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Something that can supply one page of artworks plus the catalog total.
pub trait DataSource {
    fn fetch_page(&self, window: &PageWindow) -> Result<ArtworksPage, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_report_status_zero() {
        let err = FetchError::Network("connection refused".to_string());
        assert_eq!(err.status(), 0);
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "Network error while fetching artworks.");
    }

    #[test]
    fn api_errors_carry_status_and_reason() {
        let err = FetchError::Api {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.status(), 404);
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "API error: 404 Not Found");
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = FetchError::Api {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn cancellation_is_distinct_from_failures() {
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::Network(String::new()).is_cancelled());
        assert!(FetchError::Cancelled.user_message().is_empty());
    }
}
