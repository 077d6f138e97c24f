//! Request validation.
//!
//! # Responsibilities
//! - Reject malformed input before it can reach a backend
//! - Produce the normalized payload the forwarder works with
//!
//! # Check Order (contractual, first failure wins)
//! 1. Content-Type media type is `application/json`
//! 2. Body within the size ceiling, enforced by a stream-limited read
//! 3. Body not empty
//! 4. Body is well-formed JSON
//! 5. Exactly one JSON document
//! 6. Top level is an object
//! 7. No fields other than `data`
//! 8. `data` is a non-numeric string
//!
//! The size check aborts the read as soon as the limit is crossed; an
//! oversized body is never buffered whole.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::RejectError;

/// Request content after passing all input checks, safe to forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub data: String,
}

impl Payload {
    /// Canonical wire form, `{"data":"<s>"}`.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(serde_json::to_vec(self).unwrap())
    }
}

/// Run the full validation pipeline over an inbound request.
pub async fn validate_request(
    headers: &HeaderMap,
    body: Body,
    max_body_bytes: usize,
) -> Result<Payload, RejectError> {
    require_json_content_type(headers)?;
    let bytes = read_body_limited(body, max_body_bytes).await?;
    parse_payload(&bytes)
}

/// Check 1: the Content-Type media type must be `application/json`.
/// Parameters such as `charset` are ignored; a missing header is rejected.
pub fn require_json_content_type(headers: &HeaderMap) -> Result<(), RejectError> {
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim());

    match media_type {
        Some(essence) if essence.eq_ignore_ascii_case("application/json") => Ok(()),
        _ => Err(RejectError::UnsupportedMediaType),
    }
}

/// Check 2: read the body through a length limit. A body of exactly
/// `limit` bytes is accepted; the read aborts once the limit is crossed.
pub async fn read_body_limited(body: Body, limit: usize) -> Result<Bytes, RejectError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                Err(RejectError::PayloadTooLarge)
            } else {
                Err(RejectError::BodyRead(err.to_string()))
            }
        }
    }
}

/// Checks 3-8: parse the buffered body and shape-check the `data` field.
pub fn parse_payload(body: &[u8]) -> Result<Payload, RejectError> {
    if body.is_empty() {
        return Err(RejectError::EmptyBody);
    }

    let mut documents = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
    let value = match documents.next() {
        Some(Ok(value)) => value,
        Some(Err(err)) => return Err(RejectError::MalformedJson(error_offset(body, &err))),
        // Whitespace-only input parses as no document at all.
        None => return Err(RejectError::EmptyBody),
    };
    if documents.next().is_some() {
        return Err(RejectError::MultipleDocuments);
    }

    let Value::Object(fields) = value else {
        return Err(RejectError::NotAnObject);
    };
    if let Some(unknown) = fields.keys().find(|key| key.as_str() != "data") {
        return Err(RejectError::UnknownField(unknown.clone()));
    }

    match fields.get("data") {
        Some(Value::String(data)) if !is_integer_literal(data) => Ok(Payload {
            data: data.clone(),
        }),
        // A JSON number, a digit-only string, or a missing field (which the
        // business contract reads as the empty string) all count as ints.
        Some(Value::String(_)) | Some(Value::Number(_)) | None => {
            Err(RejectError::TypeMismatch("an int"))
        }
        Some(Value::Bool(_)) => Err(RejectError::TypeMismatch("a bool")),
        Some(Value::Null) => Err(RejectError::TypeMismatch("null")),
        Some(Value::Array(_)) => Err(RejectError::TypeMismatch("an array")),
        Some(Value::Object(_)) => Err(RejectError::TypeMismatch("an object")),
    }
}

/// A `data` value the business contract treats as an integer: every
/// character is an ASCII digit. Vacuously true for the empty string.
fn is_integer_literal(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

/// Recover the 1-based byte offset of a parse error from serde_json's
/// line/column report.
fn error_offset(body: &[u8], err: &serde_json::Error) -> usize {
    let line = err.line().max(1);
    let column = err.column().max(1);
    if line == 1 {
        return column;
    }
    let mut offset = 0;
    for (index, chunk) in body.split(|b| *b == b'\n').enumerate() {
        if index + 1 == line {
            return offset + column;
        }
        offset += chunk.len() + 1;
    }
    column
}
