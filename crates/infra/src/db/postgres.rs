//! Postgres-backed persistence gateway.
//!
//! Each [`PgUnitOfWork`] owns one database transaction. Removals are staged in
//! memory, hidden from subsequent reads in the same unit of work, and flushed
//! as `DELETE`s right before the transaction commits.
//!
//! ## Error mapping
//!
//! | SQLSTATE | `PersistenceError` |
//! |----------|--------------------|
//! | `23503` (foreign key violation) | `ForeignKeyViolation` |
//! | anything else | `Database` |
//! | row decode failures | `Mapping` |
//!
//! Dropping a `PgUnitOfWork` without committing drops the transaction, which
//! sqlx rolls back.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use accounthub_accounts::{
    Database, PersistenceResult, TenantRepository, UnitOfWork, UserRepository,
};
use accounthub_core::{Tenant, TenantId, User, UserId};

use super::{map_sqlx_error, stage_removal};
use super::rows::{TenantRow, UserRow};
use super::schema;

const SELECT_TENANT: &str = r#"
    SELECT id, name, state, created_at, modified_at
    FROM tenants
    WHERE id = $1
"#;

const SELECT_USER: &str = r#"
    SELECT id, tenant_id, email, first_name, last_name, title, role,
           email_confirmed, avatar, created_at, modified_at
    FROM users
    WHERE tenant_id = $1 AND id = $2
"#;

const COUNT_TENANT_USERS: &str = r#"
    SELECT COUNT(*)
    FROM users
    WHERE tenant_id = $1 AND id <> ALL($2)
"#;

/// Connection pool handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`.
    #[instrument(skip(url), err)]
    pub async fn connect(url: &str, max_connections: u32) -> PersistenceResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the schema if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> PersistenceResult<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        tracing::info!(statements = schema::STATEMENTS.len(), "schema up to date");
        Ok(())
    }
}

#[async_trait]
impl Database for PgDatabase {
    type UnitOfWork = PgUnitOfWork;

    async fn begin(&self) -> PersistenceResult<PgUnitOfWork> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;
        Ok(PgUnitOfWork {
            tx,
            removed_tenants: Vec::new(),
            removed_users: Vec::new(),
        })
    }
}

/// One transaction plus the removals staged inside it.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
    removed_tenants: Vec<TenantId>,
    removed_users: Vec<(TenantId, UserId)>,
}

impl PgUnitOfWork {
    fn is_user_removed(&self, id: UserId) -> bool {
        self.removed_users.iter().any(|(_, removed)| *removed == id)
    }
}

#[async_trait]
impl TenantRepository for PgUnitOfWork {
    #[instrument(skip_all, fields(tenant_id = %id), err)]
    async fn get_tenant(&mut self, id: &TenantId) -> PersistenceResult<Option<Tenant>> {
        if self.removed_tenants.contains(id) {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, TenantRow>(SELECT_TENANT)
            .bind(id.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("get_tenant", e))?;

        row.map(TenantRow::into_domain).transpose()
    }

    fn remove_tenant(&mut self, tenant: Tenant) {
        stage_removal(&mut self.removed_tenants, &tenant);
    }
}

#[async_trait]
impl UserRepository for PgUnitOfWork {
    #[instrument(skip_all, fields(tenant_id = %tenant_id, user_id = %id), err)]
    async fn get_user(&mut self, tenant_id: &TenantId, id: UserId) -> PersistenceResult<Option<User>> {
        if self.is_user_removed(id) {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(tenant_id.as_str())
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;

        row.map(UserRow::into_domain).transpose()
    }

    #[instrument(skip_all, fields(tenant_id = %tenant_id), err)]
    async fn count_tenant_users(&mut self, tenant_id: &TenantId) -> PersistenceResult<u64> {
        let staged: Vec<Uuid> = self
            .removed_users
            .iter()
            .filter(|(tenant, _)| tenant == tenant_id)
            .map(|(_, id)| *id.as_uuid())
            .collect();

        let count: i64 = sqlx::query_scalar(COUNT_TENANT_USERS)
            .bind(tenant_id.as_str())
            .bind(staged)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("count_tenant_users", e))?;

        Ok(count.max(0) as u64)
    }

    fn remove_user(&mut self, user: User) {
        if !self.is_user_removed(user.id) {
            self.removed_users.push((user.tenant_id, user.id));
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    #[instrument(skip_all, err)]
    async fn commit(mut self) -> PersistenceResult<()> {
        tracing::debug!(
            removed_tenants = self.removed_tenants.len(),
            removed_users = self.removed_users.len(),
            "flushing staged removals"
        );
        // Users first: the tenant foreign key would reject the tenant delete.
        for (tenant_id, id) in &self.removed_users {
            sqlx::query("DELETE FROM users WHERE tenant_id = $1 AND id = $2")
                .bind(tenant_id.as_str())
                .bind(id.as_uuid())
                .execute(&mut *self.tx)
                .await
                .map_err(|e| map_sqlx_error("delete_user", e))?;
        }
        for id in &self.removed_tenants {
            sqlx::query("DELETE FROM tenants WHERE id = $1")
                .bind(id.as_str())
                .execute(&mut *self.tx)
                .await
                .map_err(|e| map_sqlx_error("delete_tenant", e))?;
        }

        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    async fn rollback(self) -> PersistenceResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("rollback", e))
    }
}
