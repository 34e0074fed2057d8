//! Descriptor-driven OAuth2 provider
//!
//! This module provides the [`OAuth2Adapter`] capability and
//! [`ProviderAdapter`], which implements it for any authorization-code
//! provider described by a [`ProviderDescriptor`].

use async_trait::async_trait;
use oauth2::{
    basic::BasicClient, url::Url, AuthUrl, ClientId, CsrfToken, EndpointSet, PkceCodeChallenge,
    RedirectUrl, Scope,
};

use super::descriptor::ProviderDescriptor;
use crate::config::AzureConfig;
use crate::error::OAuthError;
use crate::oauth2::http::{build_http_client, send_json};
use crate::oauth2::session::{SessionStore, CODE_VERIFIER_KEY};
use crate::oauth2::types::{
    AuthenticatedUser, AuthorizationRequest, NormalizedUser, RawProfile, TokenResponse,
};

/// OAuth2 client with the authorization endpoint configured
pub type ConfiguredClient = BasicClient<EndpointSet>;

/// Query parameters owned by the authorization request itself
const RESERVED_PARAMETERS: &[&str] = &[
    "client_id",
    "redirect_uri",
    "response_type",
    "scope",
    "state",
    "code_challenge",
    "code_challenge_method",
];

/// Authorization-code flow for one identity provider
#[async_trait]
pub trait OAuth2Adapter: Send + Sync {
    /// Whether PKCE is enabled
    fn uses_pkce(&self) -> bool;

    /// Build the authorization URL the user is redirected to
    fn authorization_url(&self, request: &AuthorizationRequest) -> Url;

    /// Exchange an authorization code for tokens
    ///
    /// When PKCE is enabled the verifier is taken from `session`.
    async fn exchange_code(
        &self,
        code: &str,
        session: &dyn SessionStore,
    ) -> Result<TokenResponse, OAuthError>;

    /// Fetch and normalize the profile of the token's owner
    async fn fetch_profile(&self, access_token: &str) -> Result<NormalizedUser, OAuthError>;

    /// Build the authorization URL, generating and storing a PKCE verifier
    /// when PKCE is enabled
    fn redirect(&self, state: &str, session: &dyn SessionStore) -> Url {
        let mut request = AuthorizationRequest::new(state);

        if self.uses_pkce() {
            let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
            session.put(CODE_VERIFIER_KEY, verifier.secret().clone());
            request = request.with_code_challenge(challenge.as_str());
        }

        self.authorization_url(&request)
    }

    /// Exchange a code and return only the access token string
    async fn access_token(
        &self,
        code: &str,
        session: &dyn SessionStore,
    ) -> Result<String, OAuthError> {
        let token = self.exchange_code(code, session).await?;
        Ok(token.access_token().to_string())
    }

    /// Fetch the profile for an access token obtained elsewhere
    async fn user_from_token(&self, access_token: &str) -> Result<NormalizedUser, OAuthError> {
        self.fetch_profile(access_token).await
    }

    /// Complete the callback: exchange the code, then fetch the profile
    async fn authenticate(
        &self,
        code: &str,
        session: &dyn SessionStore,
    ) -> Result<AuthenticatedUser, OAuthError> {
        let token = self.exchange_code(code, session).await?;
        let user = self.fetch_profile(token.access_token()).await?;
        Ok(AuthenticatedUser { user, token })
    }
}

/// Provider driven by a [`ProviderDescriptor`]
///
/// Holds no per-request state, so one instance can serve concurrent logins.
pub struct ProviderAdapter {
    descriptor: ProviderDescriptor,
    config: AzureConfig,
    /// Configured OAuth2 client used to build authorization URLs
    client: ConfiguredClient,
    /// Reusable HTTP client for token and profile requests
    http_client: reqwest::Client,
    scopes: Vec<String>,
    parameters: Vec<(String, String)>,
    pkce: bool,
}

impl ProviderAdapter {
    /// Create a provider with a default HTTP client honouring `config.proxy`
    ///
    /// # Errors
    ///
    /// Returns error if any URL or the proxy is invalid
    pub fn new(descriptor: ProviderDescriptor, config: AzureConfig) -> Result<Self, OAuthError> {
        let http_client = build_http_client(config.proxy.as_deref())?;
        Self::with_http_client(descriptor, config, http_client)
    }

    /// Create a provider on a caller-supplied HTTP client
    ///
    /// Timeouts, proxies, and connection pooling are whatever the client was
    /// built with.
    ///
    /// # Errors
    ///
    /// Returns error if the tenant, authorization endpoint, or redirect URI is
    /// invalid
    pub fn with_http_client(
        descriptor: ProviderDescriptor,
        config: AzureConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, OAuthError> {
        let tenant = Self::effective_tenant(&descriptor, &config);
        if !is_path_segment(tenant) {
            return Err(OAuthError::Config(format!(
                "Invalid tenant `{tenant}`: expected a tenant id, domain, or `common`"
            )));
        }
        let auth_url = format!("{}{}", descriptor.base_url(tenant), descriptor.authorize_path);

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(
                AuthUrl::new(auth_url)
                    .map_err(|e| OAuthError::Config(format!("Invalid auth URL: {e}")))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone())
                    .map_err(|e| OAuthError::Config(format!("Invalid redirect URI: {e}")))?,
            );

        let scopes = descriptor
            .default_scopes
            .iter()
            .map(|scope| (*scope).to_string())
            .collect();

        Ok(Self {
            descriptor,
            config,
            client,
            http_client,
            scopes,
            parameters: Vec::new(),
            pkce: false,
        })
    }

    /// Request additional scopes on top of the current ones
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for scope in scopes {
            let scope = scope.into();
            if !self.scopes.contains(&scope) {
                self.scopes.push(scope);
            }
        }
        self
    }

    /// Replace the requested scopes
    #[must_use]
    pub fn set_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.clear();
        self.with_scopes(scopes)
    }

    /// Add extra query parameters to the authorization URL
    /// (for example `prompt` or `domain_hint`)
    ///
    /// Parameters the authorization request sets itself are ignored.
    #[must_use]
    pub fn with_parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in parameters {
            let name = name.into();
            if RESERVED_PARAMETERS.contains(&name.as_str()) {
                tracing::warn!(parameter = %name, "Ignoring reserved authorization parameter");
                continue;
            }
            self.parameters.push((name, value.into()));
        }
        self
    }

    /// Enable PKCE (S256)
    #[must_use]
    pub fn enable_pkce(mut self) -> Self {
        self.pkce = true;
        self
    }

    /// Provider identifier
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        self.descriptor.identifier
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// Requested scopes
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Base URL: login host plus tenant
    #[must_use]
    pub fn base_url(&self) -> String {
        self.descriptor
            .base_url(Self::effective_tenant(&self.descriptor, &self.config))
    }

    /// Authorization endpoint
    #[must_use]
    pub fn authorization_endpoint(&self) -> String {
        format!("{}{}", self.base_url(), self.descriptor.authorize_path)
    }

    /// Token endpoint
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}{}", self.base_url(), self.descriptor.token_path)
    }

    /// Profile endpoint
    #[must_use]
    pub fn profile_endpoint(&self) -> &str {
        &self.descriptor.profile_url
    }

    /// Configured logout URL
    #[must_use]
    pub fn logout_url(&self) -> Option<&str> {
        self.config.logout_url.as_deref()
    }

    /// Configuration keys recognized beyond client id / secret / redirect
    #[must_use]
    pub const fn additional_config_keys() -> &'static [&'static str] {
        crate::config::ADDITIONAL_CONFIG_KEYS
    }

    /// Form fields posted to the token endpoint
    #[must_use]
    pub fn token_fields(
        &self,
        code: &str,
        code_verifier: Option<String>,
    ) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("grant_type", "authorization_code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("client_secret", self.config.client_secret.clone()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];

        if let Some(verifier) = code_verifier {
            fields.push(("code_verifier", verifier));
        }

        fields
    }

    fn effective_tenant<'a>(descriptor: &'a ProviderDescriptor, config: &'a AzureConfig) -> &'a str {
        config.tenant_or(descriptor.default_tenant)
    }
}

/// Tenants are placed verbatim in the URL path and must stay one segment
fn is_path_segment(tenant: &str) -> bool {
    !tenant.is_empty()
        && tenant
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[async_trait]
impl OAuth2Adapter for ProviderAdapter {
    fn uses_pkce(&self) -> bool {
        self.pkce
    }

    fn authorization_url(&self, request: &AuthorizationRequest) -> Url {
        let state = request.state.clone();

        let mut builder = self
            .client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new));

        for (name, value) in &self.parameters {
            builder = builder.add_extra_param(name.clone(), value.clone());
        }

        if self.pkce {
            if let Some(challenge) = &request.code_challenge {
                builder = builder
                    .add_extra_param("code_challenge", challenge.clone())
                    .add_extra_param("code_challenge_method", "S256");
            }
        }

        let (url, _state) = builder.url();
        url
    }

    async fn exchange_code(
        &self,
        code: &str,
        session: &dyn SessionStore,
    ) -> Result<TokenResponse, OAuthError> {
        let code_verifier = if self.pkce {
            let verifier = session.take(CODE_VERIFIER_KEY);
            if verifier.is_none() {
                tracing::warn!(
                    provider = self.identifier(),
                    "PKCE enabled but no code verifier in session"
                );
            }
            verifier
        } else {
            None
        };

        let endpoint = self.token_endpoint();
        tracing::debug!(
            provider = self.identifier(),
            endpoint = %endpoint,
            pkce = code_verifier.is_some(),
            "Exchanging authorization code"
        );

        let fields = self.token_fields(code, code_verifier);
        let response = send_json(self.http_client.post(&endpoint).form(&fields)).await?;

        if !response.status.is_success() {
            tracing::warn!(
                provider = self.identifier(),
                status = %response.status,
                "Token endpoint rejected authorization code"
            );
            return Err(OAuthError::TokenExchange {
                status: Some(response.status),
                body: response.body,
            });
        }

        TokenResponse::from_body(&response.body).map_err(|_| OAuthError::TokenExchange {
            status: Some(response.status),
            body: response.body.clone(),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<NormalizedUser, OAuthError> {
        tracing::debug!(
            provider = self.identifier(),
            endpoint = %self.descriptor.profile_url,
            "Fetching user profile"
        );

        let response = send_json(
            self.http_client
                .get(&self.descriptor.profile_url)
                .bearer_auth(access_token),
        )
        .await?;

        if !response.status.is_success() {
            tracing::warn!(
                provider = self.identifier(),
                status = %response.status,
                "Profile endpoint returned an error"
            );
            return Err(OAuthError::ProfileFetch {
                status: Some(response.status),
                body: response.body,
            });
        }

        let raw: RawProfile =
            serde_json::from_str(&response.body).map_err(|_| OAuthError::ProfileFetch {
                status: Some(response.status),
                body: response.body.clone(),
            })?;

        self.descriptor.mapping.apply(raw)
    }
}
