use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use accounthub_auth::{JwtClaims, JwtValidator, Principal, UserInfo, locale};

use crate::app::errors::json_error;
use crate::context::{PrincipalContext, TenantContext};

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the caller's identity for every request.
///
/// Always inserts a [`UserInfo`]. When a valid bearer token is present the
/// [`TenantContext`] and [`PrincipalContext`] are inserted too. A missing or
/// invalid token leaves the request anonymous; protected routes reject it in
/// [`require_principal`].
pub async fn identity_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let claims = verified_claims(&state, req.headers());

    let browser_locale = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(locale::preferred_language);
    let info = UserInfo::from_claims(claims.as_ref(), browser_locale);

    if let Some(principal) = Principal::from_user_info(&info) {
        req.extensions_mut()
            .insert(TenantContext::new(principal.tenant_id().clone()));
        req.extensions_mut().insert(PrincipalContext::new(principal));
    }
    req.extensions_mut().insert(info);

    next.run(req).await
}

/// Reject requests that did not authenticate.
pub async fn require_principal(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    if req.extensions().get::<PrincipalContext>().is_none() {
        return Err(json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "a valid bearer token is required",
        ));
    }
    Ok(next.run(req).await)
}

fn verified_claims(state: &AuthState, headers: &HeaderMap) -> Option<JwtClaims> {
    let token = extract_bearer(headers)?;
    match state.jwt.validate(token, Utc::now()) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring invalid bearer token");
            None
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
