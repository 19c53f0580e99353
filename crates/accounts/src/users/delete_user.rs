use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use accounthub_auth::{CommandAuthorization, Permission};
use accounthub_core::{TenantId, UserId};

use crate::command::{Command, CommandResult};
use crate::handler::CommandHandler;
use crate::repository::{PersistenceResult, UnitOfWork};
use crate::validation::RuleSet;

pub const CANNOT_DELETE_SELF_MESSAGE: &str = "You cannot delete yourself.";

static REQUIRED: [Permission; 1] = [Permission::USERS_DELETE];

pub fn user_not_found(id: UserId) -> String {
    format!("User with id '{id}' not found.")
}

/// Remove a user from the caller's tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub tenant_id: TenantId,
    pub id: UserId,
    /// The user issuing the request.
    pub requested_by: UserId,
}

impl Command for DeleteUserCommand {
    type Output = ();
    const NAME: &'static str = "DeleteUser";
}

impl CommandAuthorization for DeleteUserCommand {
    fn required_permissions(&self) -> &[Permission] {
        &REQUIRED
    }

    fn target_tenant(&self) -> &TenantId {
        &self.tenant_id
    }
}

pub struct DeleteUserHandler<U> {
    rules: RuleSet<DeleteUserCommand, U>,
}

impl<U: UnitOfWork + 'static> Default for DeleteUserHandler<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UnitOfWork + 'static> DeleteUserHandler<U> {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new().must("id", CANNOT_DELETE_SELF_MESSAGE, |c: &DeleteUserCommand| {
                c.id != c.requested_by
            }),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> CommandHandler<U> for DeleteUserHandler<U> {
    type Command = DeleteUserCommand;

    fn rules(&self) -> &RuleSet<DeleteUserCommand, U> {
        &self.rules
    }

    async fn handle(&self, command: DeleteUserCommand, uow: &mut U) -> PersistenceResult<CommandResult<()>> {
        let Some(user) = uow.get_user(&command.tenant_id, command.id).await? else {
            return Ok(CommandResult::not_found(user_not_found(command.id)));
        };

        uow.remove_user(user);
        Ok(CommandResult::success())
    }
}
