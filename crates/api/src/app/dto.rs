//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use accounthub_core::Tenant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
    pub state: &'static str,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id.into(),
            name: tenant.name,
            state: tenant.state.as_str(),
            created_at: tenant.created_at,
            modified_at: tenant.modified_at,
        }
    }
}
