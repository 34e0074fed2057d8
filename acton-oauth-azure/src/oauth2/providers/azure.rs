//! Microsoft identity platform (Azure AD / Entra ID) provider
//!
//! Users sign in through `login.microsoftonline.com` (v2.0 endpoints) and the
//! profile is read from Microsoft Graph `/v1.0/me`. Graph's `/me` carries no
//! nickname or avatar URL, so both stay `None`.

use super::base::ProviderAdapter;
use super::descriptor::ProviderDescriptor;
use crate::config::AzureConfig;
use crate::error::OAuthError;
use crate::oauth2::mapping::FieldMapping;

/// Unique provider identifier
pub const IDENTIFIER: &str = "AZURE";

/// Public-cloud login host
pub const LOGIN_HOST: &str = "https://login.microsoftonline.com";

/// Microsoft Graph profile endpoint
pub const GRAPH_ME_URL: &str = "https://graph.microsoft.com/v1.0/me";

/// Scopes requested by default
pub const DEFAULT_SCOPES: &[&str] = &["User.Read"];

/// Graph `/me` field mapping
pub const FIELD_MAPPING: FieldMapping = FieldMapping {
    id: "id",
    name: "displayName",
    email: "userPrincipalName",
    nickname: None,
    avatar: None,
};

/// Descriptor for the Microsoft identity platform
#[must_use]
pub fn descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        identifier: IDENTIFIER,
        login_host: LOGIN_HOST.to_string(),
        default_tenant: crate::config::DEFAULT_TENANT,
        authorize_path: "/oauth2/v2.0/authorize",
        token_path: "/oauth2/v2.0/token",
        profile_url: GRAPH_ME_URL.to_string(),
        default_scopes: DEFAULT_SCOPES,
        mapping: FIELD_MAPPING,
    }
}

impl ProviderAdapter {
    /// Create an Azure provider with a default HTTP client
    ///
    /// # Errors
    ///
    /// Returns error if the redirect URI, tenant, or proxy is invalid
    pub fn azure(config: AzureConfig) -> Result<Self, OAuthError> {
        Self::new(descriptor(), config)
    }

    /// Create an Azure provider on a caller-supplied HTTP client
    ///
    /// # Errors
    ///
    /// Returns error if the redirect URI or tenant is invalid
    pub fn azure_with_http_client(
        config: AzureConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, OAuthError> {
        Self::with_http_client(descriptor(), config, http_client)
    }
}
