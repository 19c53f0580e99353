//! Row shapes as stored in Postgres, and their mapping to domain entities.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use accounthub_accounts::{PersistenceError, PersistenceResult};
use accounthub_core::{Avatar, Tenant, TenantId, User, UserId, ValueObject};

#[derive(Debug, Clone)]
pub struct TenantRow {
    pub id: String,
    pub name: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for TenantRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(TenantRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            state: row.try_get("state")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }
}

impl TenantRow {
    pub fn into_domain(self) -> PersistenceResult<Tenant> {
        let id = TenantId::new(self.id).map_err(|e| PersistenceError::Mapping(e.to_string()))?;
        let state = self
            .state
            .parse()
            .map_err(|e: accounthub_core::DomainError| PersistenceError::Mapping(e.to_string()))?;
        Ok(Tenant {
            id,
            name: self.name,
            state,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub role: String,
    pub email_confirmed: bool,
    pub avatar: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            title: row.try_get("title")?,
            role: row.try_get("role")?,
            email_confirmed: row.try_get("email_confirmed")?,
            avatar: row.try_get("avatar")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }
}

impl UserRow {
    pub fn into_domain(self) -> PersistenceResult<User> {
        let tenant_id =
            TenantId::new(self.tenant_id).map_err(|e| PersistenceError::Mapping(e.to_string()))?;
        let role = self
            .role
            .parse()
            .map_err(|e: accounthub_core::DomainError| PersistenceError::Mapping(e.to_string()))?;
        let avatar: Avatar = decode_document("avatar", self.avatar)?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            tenant_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            title: self.title,
            role,
            email_confirmed: self.email_confirmed,
            avatar,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

/// Decode a value object stored as an embedded JSON document.
fn decode_document<V>(column: &str, value: serde_json::Value) -> PersistenceResult<V>
where
    V: ValueObject + DeserializeOwned,
{
    serde_json::from_value(value)
        .map_err(|e| PersistenceError::Mapping(format!("invalid {column} document: {e}")))
}
