use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use accounthub_auth::{CommandAuthorization, Permission};
use accounthub_core::{TenantId, User, UserId};

use crate::command::{Command, CommandResult};
use crate::handler::CommandHandler;
use crate::repository::{PersistenceResult, UnitOfWork};
use crate::validation::{FieldFailure, Rule, RuleSet};

pub const TENANT_HAS_USERS_MESSAGE: &str =
    "All users must be deleted before the tenant can be deleted.";

static REQUIRED: [Permission; 1] = [Permission::TENANTS_DELETE];

pub fn tenant_not_found(id: &TenantId) -> String {
    format!("Tenant with id '{id}' not found.")
}

/// Remove a tenant. Only allowed once the tenant owns no users.
///
/// When issued by a member of the tenant, that member's own account does not
/// block the deletion and is removed in the same unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTenantCommand {
    pub id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<UserId>,
}

impl DeleteTenantCommand {
    pub fn new(id: TenantId) -> Self {
        Self {
            id,
            requested_by: None,
        }
    }

    pub fn requested_by(mut self, user_id: UserId) -> Self {
        self.requested_by = Some(user_id);
        self
    }
}

/// The requesting user, if it belongs to the tenant being deleted.
async fn requesting_member<U: UnitOfWork>(
    command: &DeleteTenantCommand,
    uow: &mut U,
) -> PersistenceResult<Option<User>> {
    match command.requested_by {
        Some(user_id) => uow.get_user(&command.id, user_id).await,
        None => Ok(None),
    }
}

impl Command for DeleteTenantCommand {
    type Output = ();
    const NAME: &'static str = "DeleteTenant";
}

impl CommandAuthorization for DeleteTenantCommand {
    fn required_permissions(&self) -> &[Permission] {
        &REQUIRED
    }

    fn target_tenant(&self) -> &TenantId {
        &self.id
    }
}

/// Fails when the tenant still has users other than the requester.
pub struct TenantHasNoUsers;

#[async_trait]
impl<U: UnitOfWork> Rule<DeleteTenantCommand, U> for TenantHasNoUsers {
    async fn check(
        &self,
        command: &DeleteTenantCommand,
        uow: &mut U,
    ) -> PersistenceResult<Option<FieldFailure>> {
        let mut users = uow.count_tenant_users(&command.id).await?;
        if requesting_member(command, uow).await?.is_some() {
            users = users.saturating_sub(1);
        }
        if users == 0 {
            Ok(None)
        } else {
            tracing::debug!(tenant_id = %command.id, users, "tenant still has users");
            Ok(Some(FieldFailure::new("id", TENANT_HAS_USERS_MESSAGE)))
        }
    }
}

pub struct DeleteTenantHandler<U> {
    rules: RuleSet<DeleteTenantCommand, U>,
}

impl<U: UnitOfWork + 'static> Default for DeleteTenantHandler<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UnitOfWork + 'static> DeleteTenantHandler<U> {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new().rule(TenantHasNoUsers),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> CommandHandler<U> for DeleteTenantHandler<U> {
    type Command = DeleteTenantCommand;

    fn rules(&self) -> &RuleSet<DeleteTenantCommand, U> {
        &self.rules
    }

    async fn handle(
        &self,
        command: DeleteTenantCommand,
        uow: &mut U,
    ) -> PersistenceResult<CommandResult<()>> {
        let Some(tenant) = uow.get_tenant(&command.id).await? else {
            return Ok(CommandResult::not_found(tenant_not_found(&command.id)));
        };

        if let Some(requester) = requesting_member(&command, uow).await? {
            tracing::debug!(tenant_id = %command.id, user_id = %requester.id, "removing requester with tenant");
            uow.remove_user(requester);
        }
        uow.remove_tenant(tenant);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeUow, tenant, user};

    fn acme() -> TenantId {
        TenantId::new("acme").unwrap()
    }

    #[tokio::test]
    async fn rule_passes_for_empty_tenant() {
        let mut uow = FakeUow::default().with_tenant(tenant("acme"));
        let handler = DeleteTenantHandler::<FakeUow>::new();
        let failures = handler
            .rules()
            .validate(&DeleteTenantCommand::new(acme()), &mut uow)
            .await
            .unwrap();
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn rule_fails_while_users_remain() {
        let mut uow = FakeUow::default()
            .with_tenant(tenant("acme"))
            .with_user(user("acme", "a@acme.io"));
        let handler = DeleteTenantHandler::<FakeUow>::new();
        let failures = handler
            .rules()
            .validate(&DeleteTenantCommand::new(acme()), &mut uow)
            .await
            .unwrap();
        assert_eq!(failures, vec![FieldFailure::new("id", TENANT_HAS_USERS_MESSAGE)]);
    }

    #[tokio::test]
    async fn users_of_other_tenants_do_not_block() {
        let mut uow = FakeUow::default()
            .with_tenant(tenant("acme"))
            .with_user(user("globex", "b@globex.io"));
        let handler = DeleteTenantHandler::<FakeUow>::new();
        let failures = handler
            .rules()
            .validate(&DeleteTenantCommand::new(acme()), &mut uow)
            .await
            .unwrap();
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn handler_stages_removal() {
        let mut uow = FakeUow::default().with_tenant(tenant("acme"));
        let result = DeleteTenantHandler::new()
            .handle(DeleteTenantCommand::new(acme()), &mut uow)
            .await
            .unwrap();
        assert_eq!(result, CommandResult::Success(()));
        assert_eq!(uow.removed_tenants, vec![acme()]);
    }

    #[tokio::test]
    async fn missing_tenant_is_not_found_and_stages_nothing() {
        let mut uow = FakeUow::default();
        let result = DeleteTenantHandler::new()
            .handle(DeleteTenantCommand::new(acme()), &mut uow)
            .await
            .unwrap();
        assert_eq!(
            result,
            CommandResult::NotFound("Tenant with id 'acme' not found.".into())
        );
        assert!(uow.removed_tenants.is_empty());
    }

    #[tokio::test]
    async fn requester_does_not_block_own_tenant() {
        let owner = user("acme", "owner@acme.io");
        let mut uow = FakeUow::default()
            .with_tenant(tenant("acme"))
            .with_user(owner.clone());
        let handler = DeleteTenantHandler::<FakeUow>::new();
        let cmd = DeleteTenantCommand::new(acme()).requested_by(owner.id);

        let failures = handler.rules().validate(&cmd, &mut uow).await.unwrap();
        assert!(failures.is_empty());

        let result = handler.handle(cmd, &mut uow).await.unwrap();
        assert_eq!(result, CommandResult::Success(()));
        assert_eq!(uow.removed_users, vec![owner.id]);
        assert_eq!(uow.removed_tenants, vec![acme()]);
    }

    #[tokio::test]
    async fn requester_does_not_excuse_other_users() {
        let owner = user("acme", "owner@acme.io");
        let mut uow = FakeUow::default()
            .with_tenant(tenant("acme"))
            .with_user(owner.clone())
            .with_user(user("acme", "member@acme.io"));
        let failures = DeleteTenantHandler::<FakeUow>::new()
            .rules()
            .validate(&DeleteTenantCommand::new(acme()).requested_by(owner.id), &mut uow)
            .await
            .unwrap();
        assert_eq!(failures, vec![FieldFailure::new("id", TENANT_HAS_USERS_MESSAGE)]);
    }

    #[tokio::test]
    async fn requester_from_another_tenant_is_not_discounted() {
        let outsider = user("globex", "x@globex.io");
        let mut uow = FakeUow::default()
            .with_tenant(tenant("acme"))
            .with_user(outsider.clone())
            .with_user(user("acme", "a@acme.io"));
        let handler = DeleteTenantHandler::<FakeUow>::new();
        let cmd = DeleteTenantCommand::new(acme()).requested_by(outsider.id);

        let failures = handler.rules().validate(&cmd, &mut uow).await.unwrap();
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn requires_delete_permission_on_own_tenant() {
        let cmd = DeleteTenantCommand::new(acme());
        assert_eq!(cmd.required_permissions(), &[Permission::TENANTS_DELETE]);
        assert_eq!(cmd.target_tenant(), &acme());
    }
}
