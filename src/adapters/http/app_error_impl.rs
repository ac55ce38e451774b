use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{app_error::AppError, use_cases::bill_lookup::LookupError};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"message": "Not found"})),
            )
                .into_response(),
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "message": msg })),
            )
                .into_response(),
            AppError::InvalidState(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid state").into_response()
            }
            AppError::Lookup(err) => lookup_response(err),
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

/// Lookup failures keep their kind (and upstream code, if any) so the UI can
/// tell a missing customer code apart from transport trouble.
fn lookup_response(err: LookupError) -> Response {
    let (status, kind, code) = match &err {
        LookupError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", None),
        LookupError::Connection(_) => (StatusCode::BAD_GATEWAY, "CONNECTION", None),
        LookupError::Parse(_) => (StatusCode::BAD_GATEWAY, "PARSE", None),
        LookupError::InvalidResponse(_) => (StatusCode::BAD_GATEWAY, "INVALID_RESPONSE", None),
        LookupError::Upstream { code, .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "UPSTREAM", Some(*code))
        }
    };

    (
        status,
        Json(serde_json::json!({
            "kind": kind,
            "upstreamCode": code,
            "message": err.to_string(),
        })),
    )
        .into_response()
}
