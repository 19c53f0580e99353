use accounthub_core::UserRole;

use crate::Permission;

/// Static role → permission policy.
///
/// Owners hold the wildcard; admins manage users; members can only read their
/// own tenant.
pub fn permissions_for_role(role: UserRole) -> Vec<Permission> {
    match role {
        UserRole::Owner => vec![Permission::WILDCARD],
        UserRole::Admin => vec![Permission::TENANTS_READ, Permission::USERS_DELETE],
        UserRole::Member => vec![Permission::TENANTS_READ],
    }
}
