//! Rejection taxonomy and response mapping.
//!
//! # Responsibilities
//! - Classify every way an inbound request can be rejected
//! - Map each rejection to its exact `{"error": …}` body and status code
//!
//! # Design Decisions
//! - Rejections are client-caused, detected before any backend is
//!   contacted, and never retried
//! - Only the exhaustion case (504) is produced elsewhere, by the failover
//!   loop; everything here is a 4xx

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub error: String,
}

/// Classified rejection produced by the validator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectError {
    #[error("Content-Type header is not application/json")]
    UnsupportedMediaType,

    #[error("Can't read request body: http: request body too large")]
    PayloadTooLarge,

    /// The body could not be read for a reason other than the size limit
    /// (e.g. the client aborted mid-transfer).
    #[error("Can't read request body: {0}")]
    BodyRead(String),

    #[error("Request body must not be empty")]
    EmptyBody,

    /// Position is the 1-based byte offset of the first parse error.
    #[error("Request body contains badly-formed JSON (at position {0})")]
    MalformedJson(usize),

    #[error("Request body must only contain a single JSON object")]
    MultipleDocuments,

    #[error("Request body must contain a JSON object")]
    NotAnObject,

    #[error("Request body contains unknown field {0:?}")]
    UnknownField(String),

    /// Holds the observed type with its article, e.g. "an int", "a bool".
    #[error("data is {0} and not a string")]
    TypeMismatch(&'static str),
}

impl RejectError {
    pub fn status(&self) -> StatusCode {
        match self {
            RejectError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RejectError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectError::UnsupportedMediaType => "unsupported_media_type",
            RejectError::PayloadTooLarge => "payload_too_large",
            RejectError::BodyRead(_) => "body_read",
            RejectError::EmptyBody => "empty_body",
            RejectError::MalformedJson(_) => "malformed_json",
            RejectError::MultipleDocuments => "multiple_documents",
            RejectError::NotAnObject => "not_an_object",
            RejectError::UnknownField(_) => "unknown_field",
            RejectError::TypeMismatch(_) => "type_mismatch",
        }
    }
}

impl IntoResponse for RejectError {
    fn into_response(self) -> Response {
        reply(self.status(), &self.to_string())
    }
}

/// Build an `{"error": …}` response with the given status.
pub fn reply(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorMessage {
            error: message.to_string(),
        }),
    )
        .into_response()
}
