//! API-side authorization guard for commands.
//!
//! This enforces authorization at the command boundary (before dispatch),
//! so a rejected request never opens a unit of work.

use axum::http::StatusCode;
use axum::response::Response;

use accounthub_auth::{AuthzError, CommandAuthorization};

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

/// Check that the caller may run `command`, mapping a refusal to `403`.
pub fn authorize_command<C: CommandAuthorization>(
    principal: &PrincipalContext,
    command: &C,
) -> Result<(), Response> {
    accounthub_auth::authorize_command(principal.principal(), command).map_err(|e| {
        tracing::info!(user_id = %principal.user_id(), error = %e, "request forbidden");
        match e {
            AuthzError::TenantMismatch => {
                json_error(StatusCode::FORBIDDEN, "forbidden", "cannot act on another tenant")
            }
            AuthzError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()),
        }
    })
}
