//! Minimal unit of work for handler tests.

use async_trait::async_trait;
use chrono::Utc;

use accounthub_core::{Tenant, TenantId, User, UserId, UserRole};

use crate::repository::{PersistenceResult, TenantRepository, UnitOfWork, UserRepository};

pub(crate) fn tenant(id: &str) -> Tenant {
    Tenant::new(TenantId::new(id).unwrap(), id.to_uppercase(), Utc::now())
}

pub(crate) fn user(tenant_id: &str, email: &str) -> User {
    User::new(
        UserId::new(),
        TenantId::new(tenant_id).unwrap(),
        email,
        UserRole::Member,
        Utc::now(),
    )
    .unwrap()
}

#[derive(Debug, Default)]
pub(crate) struct FakeUow {
    pub tenants: Vec<Tenant>,
    pub users: Vec<User>,
    pub removed_tenants: Vec<TenantId>,
    pub removed_users: Vec<UserId>,
}

impl FakeUow {
    pub fn with_tenant(mut self, tenant: Tenant) -> Self {
        self.tenants.push(tenant);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }
}

#[async_trait]
impl TenantRepository for FakeUow {
    async fn get_tenant(&mut self, id: &TenantId) -> PersistenceResult<Option<Tenant>> {
        Ok(self
            .tenants
            .iter()
            .find(|t| &t.id == id && !self.removed_tenants.contains(&t.id))
            .cloned())
    }

    fn remove_tenant(&mut self, tenant: Tenant) {
        self.removed_tenants.push(tenant.id);
    }
}

#[async_trait]
impl UserRepository for FakeUow {
    async fn get_user(&mut self, tenant_id: &TenantId, id: UserId) -> PersistenceResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == id && &u.tenant_id == tenant_id && !self.removed_users.contains(&u.id))
            .cloned())
    }

    async fn count_tenant_users(&mut self, tenant_id: &TenantId) -> PersistenceResult<u64> {
        Ok(self
            .users
            .iter()
            .filter(|u| &u.tenant_id == tenant_id && !self.removed_users.contains(&u.id))
            .count() as u64)
    }

    fn remove_user(&mut self, user: User) {
        self.removed_users.push(user.id);
    }
}

#[async_trait]
impl UnitOfWork for FakeUow {
    async fn commit(self) -> PersistenceResult<()> {
        Ok(())
    }

    async fn rollback(self) -> PersistenceResult<()> {
        Ok(())
    }
}
