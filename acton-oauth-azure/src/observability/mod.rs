//! Observability (structured logging)
//!
//! The provider emits `tracing` events for every outbound call. Hosts that
//! already install a subscriber need nothing from this module; standalone tools
//! and tests can call [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging
///
/// Sets up:
/// - Pretty formatting in debug builds, JSON formatting in release builds
/// - Environment-based log level filtering (`RUST_LOG`)
///
/// # Example
///
/// ```rust,no_run
/// use acton_oauth_azure::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Azure provider ready");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns error if a global subscriber is already installed
pub fn init() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    #[cfg(debug_assertions)]
    {
        // Pretty formatting for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    #[cfg(not(debug_assertions))]
    {
        // JSON formatting for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    }

    Ok(())
}

fn default_filter() -> EnvFilter {
    if cfg!(debug_assertions) {
        EnvFilter::new("info,acton_oauth_azure=debug")
    } else {
        EnvFilter::new("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_installs_once() {
        assert!(init().is_ok());
        // A second global subscriber is refused
        assert!(init().is_err());
    }

    #[test]
    fn test_default_filter_mentions_crate_in_debug() {
        let rendered = default_filter().to_string();
        if cfg!(debug_assertions) {
            assert!(rendered.contains("acton_oauth_azure=debug"));
        } else {
            assert!(rendered.contains("info"));
        }
    }
}
