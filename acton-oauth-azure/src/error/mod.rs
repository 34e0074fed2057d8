//! Error types and error handling

use reqwest::StatusCode;
use thiserror::Error;

/// OAuth2 provider error type
///
/// Every operation either fully succeeds or fails with one of these variants.
/// Nothing is retried; the host decides how to present or recover.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Configuration error (invalid URL, proxy, or missing key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network, DNS, or TLS failure reaching an endpoint
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Token endpoint returned a non-success status or an unusable body
    #[error("Token exchange failed{}: {body}", status_suffix(*.status))]
    TokenExchange {
        /// HTTP status, when a response was received
        status: Option<StatusCode>,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Profile endpoint returned a non-success status or an unusable body
    #[error("Profile fetch failed{}: {body}", status_suffix(*.status))]
    ProfileFetch {
        /// HTTP status, when a response was received
        status: Option<StatusCode>,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// A required field is missing from an otherwise well-formed profile
    #[error("Profile is missing required field `{field}`")]
    Mapping {
        /// Upstream key that was expected
        field: &'static str,
    },
}

impl OAuthError {
    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::TokenExchange { status, .. } | Self::ProfileFetch { status, .. } => *status,
            Self::Transport(e) => e.status(),
            Self::Config(_) | Self::Mapping { .. } => None,
        }
    }
}

impl From<figment::Error> for OAuthError {
    fn from(e: figment::Error) -> Self {
        Self::Config(e.to_string())
    }
}

fn status_suffix(status: Option<StatusCode>) -> String {
    status.map_or_else(String::new, |s| format!(" (HTTP {s})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_exchange_display_includes_status_and_body() {
        let err = OAuthError::TokenExchange {
            status: Some(StatusCode::BAD_REQUEST),
            body: r#"{"error":"invalid_grant"}"#.to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("HTTP 400"));
        assert!(message.contains("invalid_grant"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_mapping_error_names_field() {
        let err = OAuthError::Mapping { field: "displayName" };
        assert_eq!(
            err.to_string(),
            "Profile is missing required field `displayName`"
        );
        assert!(err.status().is_none());
    }

    #[test]
    fn test_profile_fetch_without_status() {
        let err = OAuthError::ProfileFetch {
            status: None,
            body: "not json".to_string(),
        };
        assert_eq!(err.to_string(), "Profile fetch failed: not json");
    }
}
