//! Session capability for the PKCE code verifier
//!
//! The host owns the user's session. The provider only needs to stash the
//! verifier before the redirect and pull it back, exactly once, when the code
//! is exchanged.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Session key holding the PKCE code verifier
pub const CODE_VERIFIER_KEY: &str = "code_verifier";

/// Host session access required by the provider
pub trait SessionStore: Send + Sync {
    /// Store a value under `key`, replacing any previous value
    fn put(&self, key: &str, value: String);

    /// Remove and return the value under `key`
    fn take(&self, key: &str) -> Option<String>;
}

/// In-memory session store
///
/// Suitable for tests and single-process hosts that keep one store per user
/// session.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value is stored under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }
}

impl SessionStore for MemorySession {
    fn put(&self, key: &str, value: String) {
        self.values.lock().insert(key.to_string(), value);
    }

    fn take(&self, key: &str) -> Option<String> {
        self.values.lock().remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_is_destructive() {
        let session = MemorySession::new();
        session.put(CODE_VERIFIER_KEY, "verifier".to_string());
        assert!(session.contains(CODE_VERIFIER_KEY));

        assert_eq!(session.take(CODE_VERIFIER_KEY).as_deref(), Some("verifier"));
        assert!(session.take(CODE_VERIFIER_KEY).is_none());
        assert!(!session.contains(CODE_VERIFIER_KEY));
    }

    #[test]
    fn test_put_replaces() {
        let session = MemorySession::new();
        session.put("k", "one".to_string());
        session.put("k", "two".to_string());
        assert_eq!(session.take("k").as_deref(), Some("two"));
    }
}
