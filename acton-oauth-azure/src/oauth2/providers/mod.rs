//! OAuth2 provider implementations
//!
//! Providers are described by data rather than by subtyping: a
//! [`ProviderDescriptor`] names the endpoints, default scopes, and profile
//! mapping, and [`ProviderAdapter`] runs the authorization-code flow for it.
//!
//! - Microsoft identity platform (Azure AD / Entra ID), see [`azure`]

pub mod azure;
pub mod base;
pub mod descriptor;

pub use base::{ConfiguredClient, OAuth2Adapter, ProviderAdapter};
pub use descriptor::ProviderDescriptor;
