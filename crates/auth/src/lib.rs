//! `accounthub-auth` — identity context resolution and authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns a
//! bearer token into [`JwtClaims`], claims into a [`UserInfo`] descriptor, and
//! answers permission checks for commands.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod locale;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod user_info;

pub use authorize::{authorize, authorize_command, AuthzError, CommandAuthorization};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use locale::{DEFAULT_LOCALE, SUPPORTED_LOCALES, resolve_locale};
pub use permissions::Permission;
pub use principal::{Principal, TenantMembership};
pub use roles::permissions_for_role;
pub use user_info::UserInfo;
