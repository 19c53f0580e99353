use crate::validation::FieldFailure;

/// An immutable intent to change state, processed by exactly one handler.
///
/// Commands carry only the data needed for one state change. The tenant
/// context comes from the caller's identity, never from free-form input.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Value returned on success.
    type Output: Send + 'static;

    /// Stable name used in logs and traces.
    const NAME: &'static str;
}

/// A read-only request. Runs through the same unit-of-work boundary as a
/// command but never stages changes.
pub trait Query: Clone + core::fmt::Debug + Send + Sync + 'static {
    type Output: Send + 'static;

    const NAME: &'static str;
}

/// Tagged outcome of a command or query.
///
/// Recoverable outcomes are values; infrastructure faults travel separately as
/// errors and never end up in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult<T> {
    Success(T),
    NotFound(String),
    ValidationFailure(Vec<FieldFailure>),
}

impl<T> CommandResult<T> {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }
}

impl CommandResult<()> {
    pub fn success() -> Self {
        Self::Success(())
    }
}
