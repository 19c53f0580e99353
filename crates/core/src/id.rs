//! Strongly-typed identifiers used across the domain.
//!
//! Tenants are keyed by a short string (it doubles as the tenant's subdomain),
//! users by a UUID. Both are distinct wrapper types so they can never be
//! swapped for each other or for raw strings at a call site.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a tenant (multi-tenant boundary).
///
/// Valid ids are 3 to 30 characters of lowercase ASCII letters and digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 30;

    /// Parse and validate a tenant identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let len = value.len();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(DomainError::invalid_id(format!(
                "TenantId: length must be between {} and {} (got {len})",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(DomainError::invalid_id(format!(
                "TenantId: '{value}' may only contain lowercase letters and digits"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TenantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

/// Identifier of a user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<UserId> for Uuid {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("UserId: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tenant_id_accepts_lowercase_alphanumerics() {
        let id: TenantId = "acme42".parse().unwrap();
        assert_eq!(id.as_str(), "acme42");
        assert_eq!(id.to_string(), "acme42");
    }

    #[test]
    fn tenant_id_rejects_bad_input() {
        let too_long = "a".repeat(31);
        for bad in ["", "ab", "Acme", "acme-corp", "acme corp", too_long.as_str()] {
            assert!(
                matches!(TenantId::new(bad), Err(DomainError::InvalidId(_))),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn tenant_id_serde_validates() {
        let id: TenantId = serde_json::from_str("\"contoso\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"contoso\"");
        assert!(serde_json::from_str::<TenantId>("\"NOPE\"").is_err());
    }

    #[test]
    fn user_id_parse_error_names_the_type() {
        let err = "not-a-uuid".parse::<UserId>().unwrap_err();
        assert!(err.to_string().contains("UserId"));
    }

    proptest! {
        #[test]
        fn any_valid_tenant_id_parses(s in "[a-z0-9]{3,30}") {
            let id = TenantId::new(s.clone()).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        #[test]
        fn uppercase_is_never_accepted(s in "[a-z0-9]{1,14}[A-Z][a-z0-9]{1,14}") {
            prop_assert!(TenantId::new(s).is_err());
        }
    }
}
