//! User entity and its embedded avatar document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Entity, TenantId, UserId, ValueObject};

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// Role a user holds inside its tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "Owner",
            UserRole::Admin => "Admin",
            UserRole::Member => "Member",
        }
    }
}

impl core::fmt::Display for UserRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(UserRole::Owner),
            "Admin" => Ok(UserRole::Admin),
            "Member" => Ok(UserRole::Member),
            other => Err(DomainError::validation(format!("unknown user role '{other}'"))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Avatar
// ─────────────────────────────────────────────────────────────────────────────

/// Avatar settings, stored as an embedded JSON document on the user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub url: Option<String>,
    pub version: i32,
    pub is_gravatar: bool,
}

impl ValueObject for Avatar {}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A user account.
///
/// # Invariants
/// - A user belongs to exactly one tenant; `tenant_id` never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub role: UserRole,
    pub email_confirmed: bool,
    pub avatar: Avatar,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a user with an empty profile.
    ///
    /// The email is trimmed and lowercased; it must contain an `@` with text on
    /// both sides.
    pub fn new(
        id: UserId,
        tenant_id: TenantId,
        email: &str,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let email = normalize_email(email)?;
        Ok(Self {
            id,
            tenant_id,
            email,
            first_name: None,
            last_name: None,
            title: None,
            role,
            email_confirmed: false,
            avatar: Avatar::default(),
            created_at,
            modified_at: None,
        })
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(DomainError::validation(format!("invalid email '{email}'"))),
    }
}
