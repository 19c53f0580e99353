//! In-memory persistence gateway.
//!
//! Intended for tests/dev and for running the API without a database. A unit
//! of work reads the shared state directly and keeps its removals private
//! until commit, which applies them under a single write lock. The tenant
//! foreign key is enforced at commit time the way Postgres would.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use accounthub_accounts::{
    Database, PersistenceError, PersistenceResult, TenantRepository, UnitOfWork, UserRepository,
};
use accounthub_core::{Tenant, TenantId, User, UserId};

use super::stage_removal;

#[derive(Debug, Default)]
struct State {
    tenants: BTreeMap<TenantId, Tenant>,
    users: HashMap<UserId, User>,
}

impl State {
    fn tenant_user_ids(&self, tenant_id: &TenantId) -> impl Iterator<Item = UserId> + '_ {
        let tenant_id = tenant_id.clone();
        self.users
            .values()
            .filter(move |u| u.tenant_id == tenant_id)
            .map(|u| u.id)
    }
}

fn poisoned(operation: &'static str) -> PersistenceError {
    PersistenceError::Database {
        operation,
        message: "lock poisoned".to_string(),
    }
}

/// Shared tenant/user store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<RwLock<State>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, operation: &'static str) -> PersistenceResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|_| poisoned(operation))
    }

    fn write(&self, operation: &'static str) -> PersistenceResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|_| poisoned(operation))
    }

    /// Insert or replace a tenant.
    pub fn insert_tenant(&self, tenant: Tenant) -> PersistenceResult<()> {
        self.write("insert_tenant")?.tenants.insert(tenant.id.clone(), tenant);
        Ok(())
    }

    /// Insert or replace a user. The owning tenant must exist.
    pub fn insert_user(&self, user: User) -> PersistenceResult<()> {
        let mut state = self.write("insert_user")?;
        if !state.tenants.contains_key(&user.tenant_id) {
            return Err(PersistenceError::ForeignKeyViolation {
                operation: "insert_user",
                message: format!("tenant '{}' does not exist", user.tenant_id),
            });
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    pub fn tenant(&self, id: &TenantId) -> PersistenceResult<Option<Tenant>> {
        Ok(self.read("tenant")?.tenants.get(id).cloned())
    }

    pub fn user(&self, id: UserId) -> PersistenceResult<Option<User>> {
        Ok(self.read("user")?.users.get(&id).cloned())
    }

    pub fn tenant_user_count(&self, id: &TenantId) -> PersistenceResult<usize> {
        Ok(self.read("tenant_user_count")?.tenant_user_ids(id).count())
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    type UnitOfWork = InMemoryUnitOfWork;

    async fn begin(&self) -> PersistenceResult<InMemoryUnitOfWork> {
        Ok(InMemoryUnitOfWork {
            db: self.clone(),
            removed_tenants: Vec::new(),
            removed_users: Vec::new(),
        })
    }
}

/// Staged removals over an [`InMemoryDatabase`]. Dropping it discards them.
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    db: InMemoryDatabase,
    removed_tenants: Vec<TenantId>,
    removed_users: Vec<UserId>,
}

#[async_trait]
impl TenantRepository for InMemoryUnitOfWork {
    async fn get_tenant(&mut self, id: &TenantId) -> PersistenceResult<Option<Tenant>> {
        if self.removed_tenants.contains(id) {
            return Ok(None);
        }
        self.db.tenant(id)
    }

    fn remove_tenant(&mut self, tenant: Tenant) {
        stage_removal(&mut self.removed_tenants, &tenant);
    }
}

#[async_trait]
impl UserRepository for InMemoryUnitOfWork {
    async fn get_user(&mut self, tenant_id: &TenantId, id: UserId) -> PersistenceResult<Option<User>> {
        if self.removed_users.contains(&id) {
            return Ok(None);
        }
        Ok(self.db.user(id)?.filter(|u| &u.tenant_id == tenant_id))
    }

    async fn count_tenant_users(&mut self, tenant_id: &TenantId) -> PersistenceResult<u64> {
        let state = self.db.read("count_tenant_users")?;
        let count = state
            .tenant_user_ids(tenant_id)
            .filter(|id| !self.removed_users.contains(id))
            .count();
        Ok(count as u64)
    }

    fn remove_user(&mut self, user: User) {
        stage_removal(&mut self.removed_users, &user);
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self) -> PersistenceResult<()> {
        let mut state = self.db.write("commit")?;

        for id in &self.removed_tenants {
            let remaining = state
                .tenant_user_ids(id)
                .filter(|user| !self.removed_users.contains(user))
                .count();
            if remaining > 0 {
                return Err(PersistenceError::ForeignKeyViolation {
                    operation: "delete_tenant",
                    message: format!("tenant '{id}' is still referenced by {remaining} user(s)"),
                });
            }
        }

        for id in &self.removed_users {
            state.users.remove(id);
        }
        for id in &self.removed_tenants {
            state.tenants.remove(id);
        }
        tracing::debug!(
            removed_tenants = self.removed_tenants.len(),
            removed_users = self.removed_users.len(),
            "in-memory unit of work committed"
        );
        Ok(())
    }

    async fn rollback(self) -> PersistenceResult<()> {
        Ok(())
    }
}
