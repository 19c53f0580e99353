use async_trait::async_trait;

use crate::command::{Command, CommandResult, Query};
use crate::repository::{PersistenceResult, UnitOfWork};
use crate::validation::RuleSet;

/// Executes one command type inside a caller-owned unit of work.
///
/// Handlers load, mutate and stage; they never commit. Validation rules are
/// exposed separately so the dispatcher can run them (and stop) before the
/// handler is invoked.
#[async_trait]
pub trait CommandHandler<U: UnitOfWork>: Send + Sync {
    type Command: Command;

    fn rules(&self) -> &RuleSet<Self::Command, U>;

    async fn handle(
        &self,
        command: Self::Command,
        uow: &mut U,
    ) -> PersistenceResult<CommandResult<<Self::Command as Command>::Output>>;
}

/// Answers one query type from a unit of work.
#[async_trait]
pub trait QueryHandler<U: UnitOfWork>: Send + Sync {
    type Query: Query;

    async fn handle(
        &self,
        query: Self::Query,
        uow: &mut U,
    ) -> PersistenceResult<CommandResult<<Self::Query as Query>::Output>>;
}
