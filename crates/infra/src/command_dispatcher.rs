//! Command execution pipeline.
//!
//! ```text
//! Command
//!   ↓
//! 1. Begin a unit of work
//!   ↓
//! 2. Evaluate the handler's rule set      → ValidationFailure (rolled back)
//!   ↓
//! 3. Run the handler (load, mutate, stage) → NotFound (rolled back)
//!   ↓
//! 4. Commit                                 → Success
//! ```
//!
//! Any persistence fault at any step rolls the unit of work back and surfaces
//! as a [`DispatchError`]; it is never folded into a `CommandResult`. If the
//! dispatch future is dropped half way, the unit of work is dropped with it
//! and its staged changes are discarded.
//!
//! The dispatcher is an explicit registry: every command type has one
//! [`Dispatch`] implementation naming its handler, so an unregistered command
//! is a compile error rather than a runtime lookup failure.

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use accounthub_accounts::tenants::{
    DeleteTenantCommand, DeleteTenantHandler, GetTenantHandler, GetTenantQuery,
};
use accounthub_accounts::users::{DeleteUserCommand, DeleteUserHandler};
use accounthub_accounts::{
    Command, CommandHandler, CommandResult, Database, PersistenceError, Query, QueryHandler,
    UnitOfWork,
};

/// Unhandled fault while executing a command or query.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{operation}: could not begin unit of work: {source}")]
    Begin {
        operation: &'static str,
        #[source]
        source: PersistenceError,
    },

    #[error("{operation} failed: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: PersistenceError,
    },

    #[error("{operation}: commit failed: {source}")]
    Commit {
        operation: &'static str,
        #[source]
        source: PersistenceError,
    },
}

impl DispatchError {
    /// Name of the command or query that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            DispatchError::Begin { operation, .. }
            | DispatchError::Persistence { operation, .. }
            | DispatchError::Commit { operation, .. } => operation,
        }
    }
}

/// Runs command `C` through the pipeline.
#[async_trait]
pub trait Dispatch<C: Command> {
    async fn dispatch(&self, command: C) -> Result<CommandResult<C::Output>, DispatchError>;
}

/// Runs query `Q` in a read-only unit of work.
#[async_trait]
pub trait DispatchQuery<Q: Query> {
    async fn query(&self, query: Q) -> Result<CommandResult<Q::Output>, DispatchError>;
}

pub struct CommandDispatcher<D: Database> {
    db: D,
    delete_tenant: DeleteTenantHandler<D::UnitOfWork>,
    delete_user: DeleteUserHandler<D::UnitOfWork>,
    get_tenant: GetTenantHandler,
}

impl<D: Database> CommandDispatcher<D> {
    pub fn new(db: D) -> Self {
        Self {
            db,
            delete_tenant: DeleteTenantHandler::new(),
            delete_user: DeleteUserHandler::new(),
            get_tenant: GetTenantHandler,
        }
    }

    #[instrument(skip_all, fields(command = <H::Command as Command>::NAME), err)]
    async fn run<H>(
        &self,
        handler: &H,
        command: H::Command,
    ) -> Result<CommandResult<<H::Command as Command>::Output>, DispatchError>
    where
        H: CommandHandler<D::UnitOfWork>,
    {
        let operation = <H::Command as Command>::NAME;
        tracing::debug!(?command, "dispatching");

        let mut uow = self
            .db
            .begin()
            .await
            .map_err(|source| DispatchError::Begin { operation, source })?;

        let failures = match handler.rules().validate(&command, &mut uow).await {
            Ok(failures) => failures,
            Err(source) => return Err(abort(uow, operation, source).await),
        };
        if !failures.is_empty() {
            tracing::info!(failures = failures.len(), "command rejected by validation");
            release(uow, operation).await?;
            return Ok(CommandResult::ValidationFailure(failures));
        }

        let result = match handler.handle(command, &mut uow).await {
            Ok(result) => result,
            Err(source) => return Err(abort(uow, operation, source).await),
        };

        match &result {
            CommandResult::Success(_) => {
                uow.commit()
                    .await
                    .map_err(|source| DispatchError::Commit { operation, source })?;
                tracing::info!("command committed");
            }
            CommandResult::NotFound(message) => {
                tracing::info!(%message, "command target not found");
                release(uow, operation).await?;
            }
            CommandResult::ValidationFailure(_) => release(uow, operation).await?,
        }

        Ok(result)
    }

    #[instrument(skip_all, fields(query = <H::Query as Query>::NAME), err)]
    async fn run_query<H>(
        &self,
        handler: &H,
        query: H::Query,
    ) -> Result<CommandResult<<H::Query as Query>::Output>, DispatchError>
    where
        H: QueryHandler<D::UnitOfWork>,
    {
        let operation = <H::Query as Query>::NAME;
        let mut uow = self
            .db
            .begin()
            .await
            .map_err(|source| DispatchError::Begin { operation, source })?;

        match handler.handle(query, &mut uow).await {
            Ok(result) => {
                release(uow, operation).await?;
                Ok(result)
            }
            Err(source) => Err(abort(uow, operation, source).await),
        }
    }
}

async fn release<U: UnitOfWork>(uow: U, operation: &'static str) -> Result<(), DispatchError> {
    uow.rollback()
        .await
        .map_err(|source| DispatchError::Persistence { operation, source })
}

/// Roll back after a fault. The first fault wins over a failed rollback.
async fn abort<U: UnitOfWork>(uow: U, operation: &'static str, source: PersistenceError) -> DispatchError {
    if let Err(rollback) = uow.rollback().await {
        tracing::warn!(error = %rollback, "rollback after failure also failed");
    }
    DispatchError::Persistence { operation, source }
}

#[async_trait]
impl<D: Database> Dispatch<DeleteTenantCommand> for CommandDispatcher<D> {
    async fn dispatch(&self, command: DeleteTenantCommand) -> Result<CommandResult<()>, DispatchError> {
        self.run(&self.delete_tenant, command).await
    }
}

#[async_trait]
impl<D: Database> Dispatch<DeleteUserCommand> for CommandDispatcher<D> {
    async fn dispatch(&self, command: DeleteUserCommand) -> Result<CommandResult<()>, DispatchError> {
        self.run(&self.delete_user, command).await
    }
}

#[async_trait]
impl<D: Database> DispatchQuery<GetTenantQuery> for CommandDispatcher<D> {
    async fn query(
        &self,
        query: GetTenantQuery,
    ) -> Result<CommandResult<accounthub_core::Tenant>, DispatchError> {
        self.run_query(&self.get_tenant, query).await
    }
}
