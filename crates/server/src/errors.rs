use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::{ErrorKind, ServiceError};
use tracing::{error, warn};

/// JSON error body `{"error": <title>, "message": <detail>}`.
/// A 204 carries no body.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    error: &'static str,
    message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(message.into()))
    }

    pub fn status(&self) -> StatusCode { self.status }

    /// Log with operation context, then translate.
    pub fn from_service(op: &'static str, e: ServiceError) -> Self {
        if e.is_client_error() {
            warn!(op, kind = ?e.kind(), err = %e, "request rejected");
        } else {
            error!(op, kind = ?e.kind(), err = %e, "storage failure");
        }
        e.into()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = Some(e.to_string());
        match e.kind() {
            ErrorKind::Validation => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            ErrorKind::NotFound => Self::new(StatusCode::NO_CONTENT, "Not Found", msg),
            ErrorKind::AlreadyExists => Self::new(StatusCode::CONFLICT, "Already Exists", msg),
            ErrorKind::StorageTimeout => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Timeout", msg),
            ErrorKind::StorageUnavailable => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NO_CONTENT {
            return self.status.into_response();
        }
        let body = serde_json::json!({"error": self.error, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}
