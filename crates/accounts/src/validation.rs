//! Validation stage: ordered, composable rules over a command.
//!
//! Rules only read. A rule either passes or yields one [`FieldFailure`];
//! failures are reported to the caller verbatim.

use async_trait::async_trait;
use serde::Serialize;

use crate::repository::PersistenceResult;

/// One failed rule, attributed to a command field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A single validation rule for command `C`, evaluated against unit of work `U`.
#[async_trait]
pub trait Rule<C, U>: Send + Sync {
    async fn check(&self, command: &C, uow: &mut U) -> PersistenceResult<Option<FieldFailure>>;
}

/// Rule built from a synchronous predicate over the command.
pub struct FieldRule<C> {
    field: &'static str,
    message: String,
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> FieldRule<C> {
    pub fn new(
        field: &'static str,
        message: impl Into<String>,
        predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            field,
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }
}

#[async_trait]
impl<C, U> Rule<C, U> for FieldRule<C>
where
    C: Sync,
    U: Send,
{
    async fn check(&self, command: &C, _uow: &mut U) -> PersistenceResult<Option<FieldFailure>> {
        if (self.predicate)(command) {
            Ok(None)
        } else {
            Ok(Some(FieldFailure::new(self.field, self.message.clone())))
        }
    }
}

/// What to do after the first failing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeMode {
    /// Evaluate every rule and report all failures.
    #[default]
    Continue,
    /// Report only the first failure.
    Stop,
}

/// Ordered rules for one command type.
pub struct RuleSet<C, U> {
    rules: Vec<Box<dyn Rule<C, U>>>,
    cascade: CascadeMode,
}

impl<C, U> Default for RuleSet<C, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, U> RuleSet<C, U> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            cascade: CascadeMode::default(),
        }
    }

    pub fn cascade(mut self, cascade: CascadeMode) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn rule(mut self, rule: impl Rule<C, U> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

impl<C, U> RuleSet<C, U>
where
    C: Sync + 'static,
    U: Send + 'static,
{
    /// Shorthand for a [`FieldRule`].
    pub fn must(
        self,
        field: &'static str,
        message: impl Into<String>,
        predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rule(FieldRule::new(field, message, predicate))
    }

    /// Evaluate the rules in order. An empty result means the command may
    /// proceed.
    pub async fn validate(&self, command: &C, uow: &mut U) -> PersistenceResult<Vec<FieldFailure>> {
        let mut failures = Vec::new();
        for rule in &self.rules {
            if let Some(failure) = rule.check(command, uow).await? {
                failures.push(failure);
                if self.cascade == CascadeMode::Stop {
                    break;
                }
            }
        }
        Ok(failures)
    }
}
