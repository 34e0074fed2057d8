//! Shared HTTP plumbing for OAuth2 providers
//!
//! All outbound calls go through a single `reqwest::Client`. The default client
//! disables redirects (token endpoints must not be followed to a different
//! origin) and routes through the configured proxy only. Proxy environment
//! variables are ignored; the `proxy` configuration key is authoritative.

use reqwest::{header, RequestBuilder, StatusCode};

use crate::error::OAuthError;

/// Build the default HTTP client for a provider
///
/// # Errors
///
/// Returns [`OAuthError::Config`] if the proxy URL is invalid or the client
/// cannot be built
pub fn build_http_client(proxy: Option<&str>) -> Result<reqwest::Client, OAuthError> {
    let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());

    match proxy.filter(|p| !p.trim().is_empty()) {
        Some(proxy) => {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| OAuthError::Config(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        None => builder = builder.no_proxy(),
    }

    builder
        .build()
        .map_err(|e| OAuthError::Config(format!("Failed to build HTTP client: {e}")))
}

/// A fully read HTTP response
#[derive(Debug)]
pub struct RawResponse {
    /// Response status
    pub status: StatusCode,
    /// Response body as text
    pub body: String,
}

/// Send a request expecting a JSON body and read the whole response
///
/// Only transport-level failures are errors here; status handling is left to
/// the caller so it can choose the right error variant.
///
/// # Errors
///
/// Returns [`OAuthError::Transport`] if the request cannot be sent or the body
/// cannot be read
pub async fn send_json(request: RequestBuilder) -> Result<RawResponse, OAuthError> {
    let response = request
        .header(header::ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    Ok(RawResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_without_proxy() {
        assert!(build_http_client(None).is_ok());
        assert!(build_http_client(Some("")).is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        assert!(build_http_client(Some("http://proxy.internal:3128")).is_ok());
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let err = build_http_client(Some("not a url")).unwrap_err();
        assert!(matches!(err, OAuthError::Config(_)));
    }
}
