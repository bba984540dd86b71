//! Error types for the todo API client.
//!
//! # Design
//! Status codes the API documents get their own variants (404 and 400), and
//! carry the server's `error` text from the envelope. Any other non-success
//! status lands in `HttpError`.

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server returned 400; the message names the offending field.
    #[error("rejected: {0}")]
    Validation(String),

    /// The server returned another unexpected status.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// A success response was missing its payload or was inconsistent.
    #[error("malformed envelope: {0}")]
    Envelope(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
