use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use accounthub_auth::{CommandAuthorization, Permission};
use accounthub_core::{Tenant, TenantId};

use crate::command::{CommandResult, Query};
use crate::handler::QueryHandler;
use crate::repository::{PersistenceResult, UnitOfWork};
use crate::tenants::tenant_not_found;

static REQUIRED: [Permission; 1] = [Permission::TENANTS_READ];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTenantQuery {
    pub id: TenantId,
}

impl GetTenantQuery {
    pub fn new(id: TenantId) -> Self {
        Self { id }
    }
}

impl Query for GetTenantQuery {
    type Output = Tenant;
    const NAME: &'static str = "GetTenant";
}

impl CommandAuthorization for GetTenantQuery {
    fn required_permissions(&self) -> &[Permission] {
        &REQUIRED
    }

    fn target_tenant(&self) -> &TenantId {
        &self.id
    }
}

#[derive(Debug, Default)]
pub struct GetTenantHandler;

#[async_trait]
impl<U: UnitOfWork> QueryHandler<U> for GetTenantHandler {
    type Query = GetTenantQuery;

    async fn handle(&self, query: GetTenantQuery, uow: &mut U) -> PersistenceResult<CommandResult<Tenant>> {
        Ok(match uow.get_tenant(&query.id).await? {
            Some(tenant) => CommandResult::Success(tenant),
            None => CommandResult::not_found(tenant_not_found(&query.id)),
        })
    }
}
