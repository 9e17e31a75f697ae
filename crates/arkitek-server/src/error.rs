use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use arkitek_common::BootScriptError;
use arkitek_registry::RegistryError;

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

pub fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message: message.to_string(),
            request_id: format!("req_{}", Uuid::new_v4()),
        },
    };
    (status, Json(body)).into_response()
}

/// Failure of an API handler, rendered as the JSON error envelope.
#[derive(Debug)]
pub enum ApiError {
    Registry(RegistryError),
    BootScript(BootScriptError),
    MissingField(&'static str),
    InvalidBody(String),
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<BootScriptError> for ApiError {
    fn from(e: BootScriptError) -> Self {
        Self::BootScript(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Registry(e) => {
                let (status, code) = match &e {
                    RegistryError::MissingField(_) => (StatusCode::BAD_REQUEST, "missing_field"),
                    RegistryError::DuplicateName(_) => (StatusCode::BAD_REQUEST, "duplicate_name"),
                    RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    RegistryError::Persistence { .. } => {
                        tracing::error!(error = %e, "registry write failed");
                        (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error")
                    }
                };
                error_response(status, code, &e.to_string())
            }
            ApiError::BootScript(e) => {
                let code = match &e {
                    BootScriptError::MissingClusterName | BootScriptError::MissingServerCount => {
                        "missing_field"
                    }
                    BootScriptError::InvalidServerCount(_) => "invalid_server_count",
                    BootScriptError::ControlCharacter(_) => "invalid_field",
                };
                error_response(StatusCode::BAD_REQUEST, code, &e.to_string())
            }
            ApiError::MissingField(field) => error_response(
                StatusCode::BAD_REQUEST,
                "missing_field",
                &format!("{field} is required"),
            ),
            ApiError::InvalidBody(msg) => error_response(StatusCode::BAD_REQUEST, "invalid_body", &msg),
        }
    }
}
