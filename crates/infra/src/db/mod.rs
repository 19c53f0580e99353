//! Database adapters implementing the account persistence ports.

pub mod in_memory;
pub mod postgres;
pub mod rows;
pub mod schema;

use accounthub_core::Entity;

/// Record `entity` for removal once, keyed by its identity.
pub(crate) fn stage_removal<E: Entity>(staged: &mut Vec<E::Id>, entity: &E) {
    let id = entity.id();
    if !staged.contains(id) {
        staged.push(id.clone());
    }
}

pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> accounthub_accounts::PersistenceError {
    use accounthub_accounts::PersistenceError;

    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code().as_deref() {
                // foreign_key_violation
                Some("23503") => PersistenceError::ForeignKeyViolation { operation, message },
                _ => PersistenceError::Database { operation, message },
            }
        }
        sqlx::Error::PoolClosed => PersistenceError::Database {
            operation,
            message: "connection pool closed".to_string(),
        },
        err @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)) => PersistenceError::Mapping(format!("{operation}: {err}")),
        other => PersistenceError::Database {
            operation,
            message: other.to_string(),
        },
    }
}
