//! Configuration for the Azure OAuth2 provider
//!
//! The host application normally hands the provider an [`AzureConfig`] built
//! from its own settings. For standalone use, configuration can be loaded with
//! clear precedence:
//!
//! 1. Environment variables (highest priority, `AZURE_` prefix)
//! 2. The TOML file passed to [`AzureConfig::load_from`]
//!
//! # Example Configuration
//!
//! ```toml
//! # azure.toml
//! client_id = "00000000-0000-0000-0000-000000000000"
//! client_secret = "your-client-secret"
//! redirect_uri = "http://localhost:3000/auth/azure/callback"
//! tenant = "contoso.onmicrosoft.com"
//! logout_url = "https://login.microsoftonline.com/common/oauth2/v2.0/logout"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_oauth_azure::config::AzureConfig;
//!
//! # fn example() -> Result<(), acton_oauth_azure::OAuthError> {
//! let config = AzureConfig::load_from("./azure.toml")?;
//! assert_eq!(config.tenant(), "contoso.onmicrosoft.com");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::OAuthError;

/// Tenant used when none is configured
pub const DEFAULT_TENANT: &str = "common";

/// Environment variable prefix recognized by [`AzureConfig::load_from`]
pub const ENV_PREFIX: &str = "AZURE_";

/// Configuration keys this provider understands beyond the
/// client id / secret / redirect triple
pub const ADDITIONAL_CONFIG_KEYS: &[&str] = &["logout_url", "tenant"];

/// Azure provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Application (client) ID
    pub client_id: String,

    /// Client secret
    pub client_secret: String,

    /// Redirect URI registered for the application
    pub redirect_uri: String,

    /// Directory to authenticate against (`common`, `organizations`,
    /// `consumers`, a tenant id, or a verified domain)
    #[serde(default)]
    pub tenant: Option<String>,

    /// Where to send users to sign out
    #[serde(default)]
    pub logout_url: Option<String>,

    /// Proxy for outbound token and profile requests
    #[serde(default)]
    pub proxy: Option<String>,
}

impl AzureConfig {
    /// Create a configuration with the required credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            tenant: None,
            logout_url: None,
            proxy: None,
        }
    }

    /// Set the tenant
    #[must_use]
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Set the logout URL
    #[must_use]
    pub fn with_logout_url(mut self, logout_url: impl Into<String>) -> Self {
        self.logout_url = Some(logout_url.into());
        self
    }

    /// Set the outbound proxy
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Effective tenant, falling back to [`DEFAULT_TENANT`]
    #[must_use]
    pub fn tenant(&self) -> &str {
        self.tenant_or(DEFAULT_TENANT)
    }

    /// Effective tenant, falling back to `default` when unset or blank
    #[must_use]
    pub fn tenant_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.tenant.as_deref() {
            Some(tenant) if !tenant.trim().is_empty() => tenant,
            _ => default,
        }
    }

    /// Load configuration from a TOML file, overridden by `AZURE_*` variables
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Config`] if the sources cannot be read or a
    /// required key is missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, OAuthError> {
        let figment = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));

        Self::from_figment(&figment)
    }

    /// Extract configuration from a prepared figment
    ///
    /// Useful when the host already merges its own sources, for example an
    /// `[oauth2.azure]` table: `AzureConfig::from_figment(&figment.focus("oauth2.azure"))`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Config`] if extraction fails
    pub fn from_figment(figment: &Figment) -> Result<Self, OAuthError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), OAuthError> {
        for (key, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ] {
            if value.trim().is_empty() {
                return Err(OAuthError::Config(format!("`{key}` must not be empty")));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("tenant", &self.tenant)
            .field("logout_url", &self.logout_url)
            .field("proxy", &self.proxy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_tenant_defaults_to_common() {
        let config = AzureConfig::new("id", "secret", "http://localhost/callback");
        assert_eq!(config.tenant(), "common");

        let blank = config.clone().with_tenant("  ");
        assert_eq!(blank.tenant(), "common");

        let contoso = config.with_tenant("contoso");
        assert_eq!(contoso.tenant(), "contoso");
    }

    #[test]
    fn test_tenant_or_uses_given_default() {
        let config = AzureConfig::new("id", "secret", "http://localhost/callback");
        assert_eq!(config.tenant_or("organizations"), "organizations");
        assert_eq!(config.clone().with_tenant("").tenant_or("consumers"), "consumers");
        assert_eq!(config.with_tenant("contoso").tenant_or("consumers"), "contoso");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AzureConfig::new("id", "super-secret", "http://localhost/callback");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
client_id = "client-123"
client_secret = "secret-456"
redirect_uri = "http://localhost:3000/auth/azure/callback"
tenant = "contoso"
logout_url = "https://login.microsoftonline.com/contoso/oauth2/v2.0/logout"
"#
        )
        .unwrap();

        let figment = Figment::new().merge(Toml::file(file.path()));
        let config = AzureConfig::from_figment(&figment).unwrap();

        assert_eq!(config.client_id, "client-123");
        assert_eq!(config.tenant(), "contoso");
        assert_eq!(
            config.logout_url.as_deref(),
            Some("https://login.microsoftonline.com/contoso/oauth2/v2.0/logout")
        );
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"client_id = "client-123""#).unwrap();

        let figment = Figment::new().merge(Toml::file(file.path()));
        let err = AzureConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, OAuthError::Config(_)));
    }

    #[test]
    fn test_empty_client_id_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
client_id = ""
client_secret = "secret"
redirect_uri = "http://localhost/callback"
"#
        )
        .unwrap();

        let figment = Figment::new().merge(Toml::file(file.path()));
        let err = AzureConfig::from_figment(&figment).unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_additional_config_keys() {
        assert_eq!(ADDITIONAL_CONFIG_KEYS, &["logout_url", "tenant"]);
    }
}
