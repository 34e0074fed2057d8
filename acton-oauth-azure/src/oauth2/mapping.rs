//! Profile field mapping
//!
//! Each provider declares which upstream keys feed the fixed
//! [`NormalizedUser`] fields. Required keys that are absent fail the whole
//! mapping; nothing is partially filled.

use crate::error::OAuthError;

use super::types::{NormalizedUser, RawProfile};

/// Upstream keys for each normalized field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Key for the user id (required)
    pub id: &'static str,
    /// Key for the display name (required)
    pub name: &'static str,
    /// Key for the email (required)
    pub email: &'static str,
    /// Key for the nickname, `None` if the provider has no such concept
    pub nickname: Option<&'static str>,
    /// Key for the avatar URL, `None` if the profile carries none
    pub avatar: Option<&'static str>,
}

impl FieldMapping {
    /// Map a raw profile into a [`NormalizedUser`]
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Mapping`] naming the first required key that is
    /// missing, null, or empty
    pub fn apply(&self, raw: RawProfile) -> Result<NormalizedUser, OAuthError> {
        let required = |field: &'static str| raw.string(field).ok_or(OAuthError::Mapping { field });
        let optional = |field: Option<&'static str>| field.and_then(|f| raw.string(f));

        let id = required(self.id)?;
        let name = required(self.name)?;
        let email = required(self.email)?;
        let nickname = optional(self.nickname);
        let avatar = optional(self.avatar);

        Ok(NormalizedUser {
            id,
            nickname,
            name,
            email,
            avatar,
            raw,
        })
    }
}
