//! Error types for the recipe API client.
//!
//! # Design
//! The upstream API never reports "not found" as a status; an unknown search
//! simply returns `{"meals": null}`. What remains is a body that will not
//! decode (with or without a non-2xx status) and a failed round trip reported
//! by the host. Controllers collapse all three into "no new data" but keep
//! the value around so the host can tell failure apart from an empty answer.

use thiserror::Error;

/// Errors produced while fetching or parsing recipe data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx status whose body did not decode as the expected payload.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A 2xx body that could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The host could not complete the round trip (DNS, TLS, socket, abort).
    #[error("transport failed: {0}")]
    TransportError(String),
}
