//! `accounthub-accounts` — account-management application layer.
//!
//! Commands, their validation rules and handlers, plus the persistence ports
//! the handlers talk to. Infrastructure (Postgres, in-memory) implements the
//! ports in `accounthub-infra`; the per-request unit of work is owned by the
//! dispatcher there, never by a handler.

pub mod command;
pub mod handler;
pub mod repository;
pub mod tenants;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use command::{Command, CommandResult, Query};
pub use handler::{CommandHandler, QueryHandler};
pub use repository::{
    Database, PersistenceError, PersistenceResult, TenantRepository, UnitOfWork, UserRepository,
};
pub use validation::{CascadeMode, FieldFailure, FieldRule, Rule, RuleSet};
