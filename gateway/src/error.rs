//! Gateway error type and its HTTP rendering.
//!
//! Every failure is written as `{"error": "<message>"}` with a status that
//! matches the failure; 405s also carry an `Allow` header.

use axum::{
    http::{header::ALLOW, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use customer_core::ClientError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing or invalid Authorization header")]
    MissingToken,

    #[error("Invalid customer id")]
    InvalidId,

    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("Not found")]
    NotFound,

    /// A core failure, already classified.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Internal server error")]
    Internal,
}

impl GatewayError {
    /// Classify a failed login: the upstream refusing us for any client-side
    /// reason is an authentication failure.
    pub fn from_login(err: ClientError) -> Self {
        let status = match &err {
            ClientError::Auth(_) => StatusCode::UNAUTHORIZED,
            ClientError::Api { status, .. } if (400..500).contains(status) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::Upstream {
            status,
            message: err.message(),
        }
    }

    /// Classify a failed customer operation: auth failures are 401, other
    /// upstream 4xx keep their status, everything else is 500.
    pub fn from_customers(err: ClientError) -> Self {
        let status = if err.is_auth_failure() {
            StatusCode::UNAUTHORIZED
        } else {
            match err.status().and_then(|s| StatusCode::from_u16(s).ok()) {
                Some(status) if status.is_client_error() => status,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        Self::Upstream {
            status,
            message: err.message(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingToken => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidId | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        Self::from_customers(err)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, "request failed: {self}");
        } else {
            tracing::debug!(%status, "request rejected: {self}");
        }

        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        if let GatewayError::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}
