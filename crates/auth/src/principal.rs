use accounthub_core::{TenantId, UserId, UserRole};

use crate::{Permission, UserInfo, permissions_for_role};

/// A principal's membership in its tenant.
///
/// This is an authorization boundary object: it states *which tenant* the
/// principal acts within and which permissions its role grants there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantMembership {
    pub tenant_id: TenantId,
    pub role: UserRole,
    pub permissions: Vec<Permission>,
}

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub membership: TenantMembership,
}

impl Principal {
    pub fn new(user_id: UserId, tenant_id: TenantId, role: UserRole) -> Self {
        Self {
            user_id,
            membership: TenantMembership {
                tenant_id,
                role,
                permissions: permissions_for_role(role),
            },
        }
    }

    /// Build a principal from an authenticated descriptor.
    ///
    /// Returns `None` for anonymous callers.
    pub fn from_user_info(info: &UserInfo) -> Option<Self> {
        if !info.is_authenticated {
            return None;
        }
        Some(Self::new(info.user_id?, info.tenant_id.clone()?, info.user_role?))
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.membership.tenant_id
    }
}
