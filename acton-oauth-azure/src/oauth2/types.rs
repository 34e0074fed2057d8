//! OAuth2 request and response types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OAuthError;

/// Parameters for a single authorization redirect
///
/// The `state` token is generated and validated by the host; this crate only
/// places it on the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Opaque anti-forgery token
    pub state: String,
    /// S256 PKCE code challenge, present only when PKCE is in use
    pub code_challenge: Option<String>,
}

impl AuthorizationRequest {
    /// Create a request without PKCE
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            code_challenge: None,
        }
    }

    /// Attach a PKCE code challenge
    #[must_use]
    pub fn with_code_challenge(mut self, challenge: impl Into<String>) -> Self {
        self.code_challenge = Some(challenge.into());
        self
    }
}

/// Raw token endpoint response
///
/// Kept as the unmodified JSON object so callers can read provider-specific
/// fields (`id_token`, `ext_expires_in`, ...). Construction guarantees an
/// `access_token` string is present.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct TokenResponse {
    raw: Map<String, Value>,
}

impl TokenResponse {
    /// Parse a token endpoint body
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::TokenExchange`] if the body is not a JSON object
    /// or carries no `access_token`
    pub fn from_body(body: &str) -> Result<Self, OAuthError> {
        let malformed = || OAuthError::TokenExchange {
            status: None,
            body: body.to_string(),
        };

        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(raw)) => Self::try_from(raw).map_err(|_| malformed()),
            _ => Err(malformed()),
        }
    }

    /// Bearer access token
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.str_field("access_token").unwrap_or_default()
    }

    /// Refresh token, when `offline_access` was granted
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.str_field("refresh_token")
    }

    /// Token type, usually `Bearer`
    #[must_use]
    pub fn token_type(&self) -> Option<&str> {
        self.str_field("token_type")
    }

    /// Lifetime of the access token in seconds
    ///
    /// Accepts both numeric and string encodings.
    #[must_use]
    pub fn expires_in(&self) -> Option<u64> {
        match self.raw.get("expires_in")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Scopes granted by the provider
    #[must_use]
    pub fn scopes(&self) -> Vec<String> {
        self.str_field("scope")
            .map(|scope| scope.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Look up any field of the response
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The unmodified JSON object
    #[must_use]
    pub const fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token().map(|_| "[redacted]"))
            .field("token_type", &self.token_type())
            .field("expires_in", &self.expires_in())
            .field("scope", &self.str_field("scope"))
            .finish_non_exhaustive()
    }
}

impl TryFrom<Map<String, Value>> for TokenResponse {
    type Error = String;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        match raw.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(Self { raw }),
            _ => Err("token response has no access_token".to_string()),
        }
    }
}

impl From<TokenResponse> for Map<String, Value> {
    fn from(token: TokenResponse) -> Self {
        token.raw
    }
}

/// Raw profile endpoint response, shape defined by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProfile(pub Map<String, Value>);

impl RawProfile {
    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a field as a non-empty string
    ///
    /// Numbers are rendered to strings so numeric ids map cleanly.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Provider-independent user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedUser {
    /// Provider-specific user ID
    pub id: String,
    /// Nickname, when the provider has one
    pub nickname: Option<String>,
    /// Display name
    pub name: String,
    /// Email or principal name
    pub email: String,
    /// Avatar URL, when the provider exposes one
    pub avatar: Option<String>,
    /// The unmodified profile payload
    pub raw: RawProfile,
}

/// A normalized user together with the token that authorized the lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The normalized profile
    pub user: NormalizedUser,
    /// The token endpoint response
    pub token: TokenResponse,
}

impl AuthenticatedUser {
    /// Access token used to fetch the profile
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.access_token()
    }

    /// Refresh token, if issued
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.token.refresh_token()
    }

    /// Access token lifetime in seconds, if reported
    #[must_use]
    pub fn expires_in(&self) -> Option<u64> {
        self.token.expires_in()
    }

    /// Scopes the user approved
    #[must_use]
    pub fn approved_scopes(&self) -> Vec<String> {
        self.token.scopes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_response_extracts_access_token() {
        let token = TokenResponse::from_body(r#"{"access_token":"abc123"}"#).unwrap();
        assert_eq!(token.access_token(), "abc123");
        assert!(token.refresh_token().is_none());
        assert!(token.scopes().is_empty());
    }

    #[test]
    fn test_token_response_accessors() {
        let body = json!({
            "token_type": "Bearer",
            "scope": "User.Read profile openid email",
            "expires_in": "3599",
            "access_token": "eyJ0eXAi",
            "refresh_token": "AwABAAAA",
            "id_token": "eyJhbGci"
        })
        .to_string();

        let token = TokenResponse::from_body(&body).unwrap();
        assert_eq!(token.token_type(), Some("Bearer"));
        assert_eq!(token.expires_in(), Some(3599));
        assert_eq!(token.refresh_token(), Some("AwABAAAA"));
        assert_eq!(
            token.scopes(),
            vec!["User.Read", "profile", "openid", "email"]
        );
        assert_eq!(token.get("id_token"), Some(&json!("eyJhbGci")));
    }

    #[test]
    fn test_token_response_rejects_missing_access_token() {
        let err = TokenResponse::from_body(r#"{"token_type":"Bearer"}"#).unwrap_err();
        match err {
            OAuthError::TokenExchange { status, body } => {
                assert!(status.is_none());
                assert!(body.contains("Bearer"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_token_response_rejects_non_object() {
        assert!(TokenResponse::from_body("[1,2,3]").is_err());
        assert!(TokenResponse::from_body("<html>").is_err());
    }

    #[test]
    fn test_token_response_serde_validates() {
        let ok: Result<TokenResponse, _> =
            serde_json::from_value(json!({"access_token": "t"}));
        assert!(ok.is_ok());

        let missing: Result<TokenResponse, _> = serde_json::from_value(json!({"scope": "x"}));
        assert!(missing.is_err());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let token = TokenResponse::from_body(
            &json!({
                "access_token": "secret-access",
                "refresh_token": "secret-refresh",
                "id_token": "secret-id",
                "token_type": "Bearer",
                "expires_in": 3599
            })
            .to_string(),
        )
        .unwrap();

        let user = AuthenticatedUser {
            user: NormalizedUser {
                id: "u1".to_string(),
                nickname: None,
                name: "Jane Doe".to_string(),
                email: "jane@contoso.com".to_string(),
                avatar: None,
                raw: RawProfile::default(),
            },
            token,
        };

        for rendered in [format!("{:?}", user.token), format!("{user:?}")] {
            assert!(!rendered.contains("secret-"), "leaked token: {rendered}");
            assert!(rendered.contains("[redacted]"));
            assert!(rendered.contains("Bearer"));
        }
    }

    #[test]
    fn test_raw_profile_string_lookup() {
        let profile: RawProfile = serde_json::from_value(json!({
            "id": "u1",
            "number": 42,
            "empty": "",
            "null": null
        }))
        .unwrap();

        assert_eq!(profile.string("id").as_deref(), Some("u1"));
        assert_eq!(profile.string("number").as_deref(), Some("42"));
        assert!(profile.string("empty").is_none());
        assert!(profile.string("null").is_none());
        assert!(profile.string("absent").is_none());
    }
}
