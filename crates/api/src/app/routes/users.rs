use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use accounthub_accounts::users::DeleteUserCommand;
use accounthub_core::UserId;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::invalid_id(format!("{e}")),
    };

    let cmd = DeleteUserCommand {
        tenant_id: tenant.tenant_id().clone(),
        id,
        requested_by: principal.user_id(),
    };
    if let Err(resp) = crate::authz::authorize_command(&principal, &cmd) {
        return resp;
    }

    errors::dispatch_to_response(services.dispatch(cmd).await, |()| {
        StatusCode::NO_CONTENT.into_response()
    })
}
