//! Tenant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Entity, TenantId};

/// Lifecycle state of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TenantState {
    #[default]
    Trial,
    Active,
    Suspended,
}

impl TenantState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantState::Trial => "Trial",
            TenantState::Active => "Active",
            TenantState::Suspended => "Suspended",
        }
    }
}

impl core::fmt::Display for TenantState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TenantState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Trial" => Ok(TenantState::Trial),
            "Active" => Ok(TenantState::Active),
            "Suspended" => Ok(TenantState::Suspended),
            other => Err(DomainError::validation(format!(
                "unknown tenant state '{other}'"
            ))),
        }
    }
}

/// A tenant: the multi-tenant boundary that owns users.
///
/// # Invariants
/// - A tenant can only be removed once it owns no users. The check lives in
///   the delete-tenant validation rules; the database foreign key is a
///   backstop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub state: TenantState,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn new(id: TenantId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            state: TenantState::default(),
            created_at,
            modified_at: None,
        }
    }
}

impl Entity for Tenant {
    type Id = TenantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
