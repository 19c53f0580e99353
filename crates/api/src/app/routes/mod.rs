use axum::{Router, routing::{delete, get}};

pub mod system;
pub mod tenants;
pub mod users;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/tenants/:id",
            get(tenants::get_tenant).delete(tenants::delete_tenant),
        )
        .route("/api/users/:id", delete(users::delete_user))
}
