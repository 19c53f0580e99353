//! Infrastructure layer: persistence gateways and the command dispatcher.

pub mod command_dispatcher;
pub mod db;


pub use command_dispatcher::{CommandDispatcher, Dispatch, DispatchError, DispatchQuery};
pub use db::in_memory::{InMemoryDatabase, InMemoryUnitOfWork};
pub use db::postgres::{PgDatabase, PgUnitOfWork};
