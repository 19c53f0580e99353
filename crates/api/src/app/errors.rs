use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use accounthub_accounts::CommandResult;
use accounthub_infra::DispatchError;

pub fn dispatch_error_to_response(err: DispatchError) -> Response {
    tracing::error!(operation = err.operation(), error = %err, "unhandled failure");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "the request could not be completed",
    )
}

/// Map a recoverable outcome to HTTP; `on_success` renders the value.
pub fn command_result_to_response<T>(
    result: CommandResult<T>,
    on_success: impl FnOnce(T) -> Response,
) -> Response {
    match result {
        CommandResult::Success(value) => on_success(value),
        CommandResult::NotFound(message) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        CommandResult::ValidationFailure(failures) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "errors": failures,
            })),
        )
            .into_response(),
    }
}

pub fn dispatch_to_response<T>(
    outcome: Result<CommandResult<T>, DispatchError>,
    on_success: impl FnOnce(T) -> Response,
) -> Response {
    match outcome {
        Ok(result) => command_result_to_response(result, on_success),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn invalid_id(message: impl Into<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", message)
}
