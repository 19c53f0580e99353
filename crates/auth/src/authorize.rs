use thiserror::Error;

use accounthub_core::TenantId;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Command-side authorization contract (checked at the command boundary).
///
/// The API layer enforces these requirements before dispatching.
pub trait CommandAuthorization {
    fn required_permissions(&self) -> &[Permission];

    /// Tenant the command acts on. Principals may only act on their own tenant.
    fn target_tenant(&self) -> &TenantId;
}

/// Authorize a principal for a single permission.
///
/// Pure policy check: no IO, no panics.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = principal
        .membership
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Authorize a principal for every permission a command requires, within the
/// command's target tenant.
pub fn authorize_command<C: CommandAuthorization + ?Sized>(
    principal: &Principal,
    command: &C,
) -> Result<(), AuthzError> {
    if principal.tenant_id() != command.target_tenant() {
        return Err(AuthzError::TenantMismatch);
    }
    for perm in command.required_permissions() {
        authorize(principal, perm)?;
    }
    Ok(())
}
