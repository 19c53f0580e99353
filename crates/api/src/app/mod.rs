//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: persistence wiring (in-memory or Postgres) and dispatch
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses and result mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices, jwt_secret: String) -> Router {
    let jwt = Arc::new(accounthub_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require an authenticated principal.
    let protected = routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(axum::middleware::from_fn(middleware::require_principal));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/user-info", get(routes::system::user_info))
        .merge(protected)
        .layer(
            ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::identity_middleware,
            )),
        )
}
