//! Error types for the customer API client.
//!
//! # Design
//! Every failure the core can observe collapses into one of a handful of
//! variants so that a terminal message and an HTTP error body can be built
//! from the same value. The core never recovers from any of them: each
//! operation returns the first error it hits.

use thiserror::Error;

/// Errors returned by `Transport`, `AuthService` and `CustomerService`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The upstream could not be reached (DNS, refused connection, timeout,
    /// or the response body could not be read).
    #[error("could not reach the customer API: {0}")]
    Connectivity(String),

    /// The upstream answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A success response carried a body that was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decoding(String),

    /// A login response did not carry a usable token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request payload could not be serialized to JSON.
    #[error("could not encode request body: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Text suitable for showing to an end user.
    ///
    /// For `Api` this is the upstream's own message without the status
    /// prefix, which is what the gateway writes into `{"error": ...}`.
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure means the caller is not (or no longer)
    /// authenticated.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ClientError::Auth(_) => true,
            ClientError::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Upstream status code, when the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
