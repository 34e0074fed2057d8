//! OAuth2 authorization-code support
//!
//! This module talks to the identity provider on behalf of a host framework:
//! - Building the authorization redirect URL
//! - Exchanging the callback code at the token endpoint
//! - Fetching the user profile and normalizing it
//!
//! The host keeps the `state` token and the user's session. When PKCE is
//! enabled the provider reads and writes the code verifier through the
//! [`SessionStore`] the host passes in.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use acton_oauth_azure::config::AzureConfig;
//! use acton_oauth_azure::oauth2::{MemorySession, OAuth2Adapter, ProviderAdapter};
//!
//! # async fn example() -> Result<(), acton_oauth_azure::OAuthError> {
//! let config = AzureConfig::new(
//!     std::env::var("AZURE_CLIENT_ID").unwrap_or_default(),
//!     std::env::var("AZURE_CLIENT_SECRET").unwrap_or_default(),
//!     "http://localhost:3000/auth/azure/callback",
//! )
//! .with_tenant("contoso");
//!
//! let provider = ProviderAdapter::azure(config)?.enable_pkce();
//! let session = MemorySession::new();
//!
//! // Login: send the user here
//! let url = provider.redirect("state-from-host", &session);
//! println!("{url}");
//!
//! // Callback: the host has validated `state` and extracted `code`
//! let login = provider.authenticate("code-from-callback", &session).await?;
//! println!("{} <{}>", login.user.name, login.user.email);
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - **State Tokens**: generated and validated by the host; passed through verbatim
//! - **PKCE**: S256 challenges; the verifier is removed from the session when read
//! - **Redirects**: the default HTTP client never follows redirects
//! - **Secrets**: the client secret and tokens are never logged

pub mod http;
pub mod mapping;
pub mod providers;
pub mod session;
pub mod types;

pub use mapping::FieldMapping;
pub use providers::{OAuth2Adapter, ProviderAdapter, ProviderDescriptor};
pub use session::{MemorySession, SessionStore, CODE_VERIFIER_KEY};
pub use types::{AuthenticatedUser, AuthorizationRequest, NormalizedUser, RawProfile, TokenResponse};
