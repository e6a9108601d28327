//! Error types for the Realforce API client.
//!
//! # Design
//! Every failure the client can report is a variant of `ApiError`. The
//! `Display` text of the variants that the client records as its last error
//! matches what callers see through `RealforceClient::last_error`, so the two
//! never disagree. A valid-but-falsy JSON body is not an error: it surfaces as
//! `Payload::Falsy` instead.

use thiserror::Error;

/// Errors returned by the query builders, the resource accessors and
/// `RealforceClient::request`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured transport cannot issue requests.
    #[error("an HTTP transport is required, but can't be found")]
    TransportUnavailable,

    /// A builder was projected before a required field was set.
    #[error("required field `{0}` must be set before the request is built")]
    MissingField(&'static str),

    /// A builder setter rejected its argument. The builder is left untouched.
    #[error("{0}")]
    Validation(String),

    /// No resource group or operation is registered under this name.
    #[error("Undefined method {0}")]
    UndefinedMethod(String),

    /// The target URL could not be parsed.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body is not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The transport failed before producing a response body.
    #[error("{0}")]
    Transport(String),

    /// The exchange took at least as long as the requested timeout.
    #[error("Request timed out after {elapsed:.6} seconds.")]
    Timeout { elapsed: f64 },

    /// Non-2xx status with a `message` field in the body.
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    /// Non-2xx status with nothing usable in the body.
    #[error("Unknown error, call last_response() to find out what happened.")]
    Unknown,
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
