//! Persistence ports.
//!
//! A unit of work is one transaction scope. Repositories are views over it:
//! reads see the transaction's state including changes staged earlier in the
//! same unit of work, and removals are staged until [`UnitOfWork::commit`].
//! Dropping a unit of work without committing discards everything it staged.

use async_trait::async_trait;
use thiserror::Error;

use accounthub_core::{Tenant, TenantId, User, UserId};

/// Infrastructure fault raised by a persistence adapter.
///
/// These are the "unhandled" category: they are propagated to the caller as
/// errors and never turned into a [`crate::CommandResult`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    #[error("foreign key violation in {operation}: {message}")]
    ForeignKeyViolation {
        operation: &'static str,
        message: String,
    },

    #[error("failed to map stored row: {0}")]
    Mapping(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[async_trait]
pub trait TenantRepository: Send {
    async fn get_tenant(&mut self, id: &TenantId) -> PersistenceResult<Option<Tenant>>;

    /// Stage the tenant for removal.
    fn remove_tenant(&mut self, tenant: Tenant);
}

#[async_trait]
pub trait UserRepository: Send {
    /// Tenant-scoped lookup: a user of another tenant reads as absent.
    async fn get_user(&mut self, tenant_id: &TenantId, id: UserId) -> PersistenceResult<Option<User>>;

    async fn count_tenant_users(&mut self, tenant_id: &TenantId) -> PersistenceResult<u64>;

    /// Stage the user for removal.
    fn remove_user(&mut self, user: User);
}

/// One request's transaction scope.
#[async_trait]
pub trait UnitOfWork: TenantRepository + UserRepository + Send + Sized {
    /// Flush staged changes and commit.
    async fn commit(self) -> PersistenceResult<()>;

    /// Discard staged changes and roll back.
    async fn rollback(self) -> PersistenceResult<()>;
}

/// Source of units of work (a connection pool, or an in-memory store).
#[async_trait]
pub trait Database: Send + Sync + 'static {
    type UnitOfWork: UnitOfWork + 'static;

    async fn begin(&self) -> PersistenceResult<Self::UnitOfWork>;
}
