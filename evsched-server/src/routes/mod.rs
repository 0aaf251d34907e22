pub mod envelope;
pub mod events;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use evsched_core::EvschedError;
use serde::Serialize;

/// Standard JSON error body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: &'static str,
}

/// Maps core errors onto HTTP status codes for the JSON protocol.
pub struct AppError(EvschedError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EvschedError::NotFound => StatusCode::NOT_FOUND,
            EvschedError::MissingField(_)
            | EvschedError::InvalidField { .. }
            | EvschedError::InvalidFormat { .. }
            | EvschedError::MalformedEnvelope(_)
            | EvschedError::UnknownOperation => StatusCode::BAD_REQUEST,
            EvschedError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            status: "error",
        });
        (status, body).into_response()
    }
}

impl From<EvschedError> for AppError {
    fn from(err: EvschedError) -> Self {
        Self(err)
    }
}
