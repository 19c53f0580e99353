//! Tenant commands and queries.

mod delete_tenant;
mod get_tenant;

pub use delete_tenant::{
    DeleteTenantCommand, DeleteTenantHandler, TENANT_HAS_USERS_MESSAGE, TenantHasNoUsers,
    tenant_not_found,
};
pub use get_tenant::{GetTenantHandler, GetTenantQuery};
