use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use accounthub_accounts::tenants::{DeleteTenantCommand, GetTenantQuery};
use accounthub_core::TenantId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub async fn get_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id = match TenantId::new(id) {
        Ok(id) => id,
        Err(e) => return errors::invalid_id(e.to_string()),
    };

    let query = GetTenantQuery::new(id);
    if let Err(resp) = crate::authz::authorize_command(&principal, &query) {
        return resp;
    }

    errors::dispatch_to_response(services.query(query).await, |tenant| {
        (StatusCode::OK, Json(dto::TenantResponse::from(tenant))).into_response()
    })
}

pub async fn delete_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id = match TenantId::new(id) {
        Ok(id) => id,
        Err(e) => return errors::invalid_id(e.to_string()),
    };

    let cmd = DeleteTenantCommand::new(id).requested_by(principal.user_id());
    if let Err(resp) = crate::authz::authorize_command(&principal, &cmd) {
        return resp;
    }

    errors::dispatch_to_response(services.dispatch(cmd).await, |()| {
        StatusCode::NO_CONTENT.into_response()
    })
}
