use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use claimfile_core::{filler::FillError, ValidationError};
use claimfile_enrich::EnrichError;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An enrichment or download failure; `context` heads the message for 5xx errors.
    #[error("{context}: {source}")]
    Enrich {
        context: &'static str,
        source: EnrichError,
    },
    #[error("Failed to generate PDF: {0}")]
    Fill(#[from] FillError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// `map_err` adapter that tags an [`EnrichError`] with what the route was doing.
    pub fn enrich(context: &'static str) -> impl FnOnce(EnrichError) -> ApiError {
        move |source| ApiError::Enrich { context, source }
    }

    fn status_and_body(&self) -> (StatusCode, Value) {
        match self {
            ApiError::Validation(ValidationError::MissingFields(fields)) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing required fields", "missingFields": fields }),
            ),
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
            ApiError::Enrich { context, source } => match source {
                EnrichError::InvalidInput(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
                EnrichError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
                EnrichError::MissingCredential(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": source.to_string() }),
                ),
                EnrichError::Upstream { .. }
                | EnrichError::InvalidResponse(_)
                | EnrichError::Http(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": context, "details": source.to_string() }),
                ),
            },
            ApiError::Fill(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to generate PDF", "details": e.to_string() }),
            ),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": m })),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!(status = %status, "request failed: {self}");
        } else {
            info!(status = %status, "request rejected: {self}");
        }
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
