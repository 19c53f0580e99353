use axum::{Extension, Json, http::StatusCode};

use accounthub_auth::UserInfo;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Identity descriptor of the caller. Anonymous callers are answered too.
pub async fn user_info(Extension(info): Extension<UserInfo>) -> Json<UserInfo> {
    Json(info)
}
