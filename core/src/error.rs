//! Error types for the fetch client and the multipart extractor.
//!
//! # Design
//! Transport and body-read failures keep the underlying `ureq::Error` so
//! callers can match on timeouts or connection failures. Serde failures are
//! flattened to strings; the caller only needs the message.

use thiserror::Error;

/// Errors returned by `execute`, `Options`, `Response` and `MultipartForm`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The destination uses the websocket protocol, which is not supported.
    #[error("the `websocket` protocol is not supported: {0}")]
    UnsupportedProtocol(String),

    /// The URI, method or a header could not be turned into a request.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ureq::http::Error),

    /// The context deadline passed before the request was sent.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The HTTP client failed to complete the round-trip.
    #[error(transparent)]
    Transport(ureq::Error),

    /// The response arrived but its body could not be buffered.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] ureq::Error),

    /// A body accessor was called on a response with an empty body.
    #[error("body invalid: response body is empty")]
    EmptyBody,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The inbound multipart body could not be parsed.
    #[error("malformed multipart request: {0}")]
    MalformedRequest(String),

    /// One uploaded file could not be read. Logged and skipped by the
    /// extractor, never returned from it.
    #[error("failed to read uploaded file {filename:?}: {reason}")]
    FileRead { filename: String, reason: String },
}
