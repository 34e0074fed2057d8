//! acton-oauth-azure: Microsoft identity platform OAuth2 provider
//!
//! Authenticates users against Azure AD / Entra ID with the OAuth2
//! authorization-code flow and returns a normalized profile from Microsoft
//! Graph. Session handling, `state` validation, and routing belong to the host
//! framework; this crate only speaks to the provider.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_oauth_azure::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_oauth_azure::observability::init()?;
//!
//!     let config = AzureConfig::load_from("./azure.toml")?;
//!     let provider = ProviderAdapter::azure(config)?;
//!
//!     let url = provider.authorization_url(&AuthorizationRequest::new("opaque-state"));
//!     tracing::info!(%url, "Redirect the user to sign in");
//!
//!     let session = MemorySession::new();
//!     let token = provider.exchange_code("code-from-callback", &session).await?;
//!     let user = provider.fetch_profile(token.access_token()).await?;
//!     tracing::info!(id = %user.id, email = %user.email, "Signed in");
//!
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod oauth2;
pub mod observability;

pub use error::OAuthError;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_oauth_azure::prelude::*;
    //! ```

    // Configuration
    pub use crate::config::AzureConfig;

    // Error types
    pub use crate::error::OAuthError;

    // OAuth2 flow
    pub use crate::oauth2::{
        AuthenticatedUser, AuthorizationRequest, MemorySession, NormalizedUser, OAuth2Adapter,
        ProviderAdapter, ProviderDescriptor, SessionStore, TokenResponse,
    };
}
