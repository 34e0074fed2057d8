//! Provider descriptors
//!
//! A descriptor is the small amount of data that distinguishes one
//! authorization-code provider from another: where its endpoints live, which
//! scopes it asks for by default, and how its profile maps onto
//! [`NormalizedUser`](crate::oauth2::NormalizedUser).

use crate::oauth2::mapping::FieldMapping;

/// Static description of an OAuth2 provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Unique provider identifier
    pub identifier: &'static str,
    /// Login host, without trailing slash or tenant
    pub login_host: String,
    /// Tenant used when the configuration leaves it unset
    pub default_tenant: &'static str,
    /// Authorization endpoint path, relative to the base URL
    pub authorize_path: &'static str,
    /// Token endpoint path, relative to the base URL
    pub token_path: &'static str,
    /// Absolute profile endpoint URL
    pub profile_url: String,
    /// Scopes requested unless the caller replaces them
    pub default_scopes: &'static [&'static str],
    /// Profile field mapping
    pub mapping: FieldMapping,
}

impl ProviderDescriptor {
    /// Point the descriptor at a different login host
    ///
    /// Used for sovereign clouds (for example `https://login.microsoftonline.us`)
    /// and for tests against a local server.
    #[must_use]
    pub fn with_login_host(mut self, login_host: impl Into<String>) -> Self {
        self.login_host = login_host.into();
        self
    }

    /// Point the descriptor at a different profile endpoint
    #[must_use]
    pub fn with_profile_url(mut self, profile_url: impl Into<String>) -> Self {
        self.profile_url = profile_url.into();
        self
    }

    /// Base URL for a tenant: `{login_host}/{tenant}`
    #[must_use]
    pub fn base_url(&self, tenant: &str) -> String {
        format!("{}/{}", self.login_host.trim_end_matches('/'), tenant)
    }
}
