//! Error responses shared by the route handlers
//!
//! Every failure is returned as `{"message": "..."}`; the admin console
//! shows that message to the operator.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, message: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

pub fn map_core_error(err: mb_core::Error) -> RouteError {
    use mb_core::Error;

    let status = match &err {
        Error::MemberNotFound(_) | Error::HealthApplicationNotFound(_) | Error::NotFound(_) => {
            StatusCode::NOT_FOUND
        }
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Io(_) | Error::Serialization(_) | Error::Storage(_) => {
            error!("Store failure: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    route_error(status, err.to_string())
}

/// Malformed or mistyped JSON bodies
pub fn map_json_rejection(rejection: JsonRejection) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn parse_uuid(raw: &str, what: &str) -> Result<uuid::Uuid, RouteError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|_| route_error(StatusCode::BAD_REQUEST, format!("Invalid {} ID", what)))
}
