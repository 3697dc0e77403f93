use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{
        header::{self, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS},
        StatusCode,
    },
    response::IntoResponse,
    Json,
};
use customer_core::Customer;
use serde::Deserialize;

use super::{blocking, parse_json};
use crate::error::GatewayError;
use crate::extract::BearerToken;
use crate::state::AppState;

/// Methods advertised on every `/api/customers` path.
pub const ALLOW: &str = "GET, POST, PUT, DELETE, OPTIONS";

const ALLOW_HEADERS: &str = "Content-Type, Authorization";

#[derive(Deserialize)]
struct CustomerPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

impl CustomerPayload {
    /// Trimmed `(name, email)`; both must be non-empty.
    fn into_fields(self) -> Result<(String, String), GatewayError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        if name.is_empty() || email.is_empty() {
            return Err(GatewayError::BadRequest("Name and email are required".to_string()));
        }
        Ok((name, email))
    }
}

fn parse_id(raw: &str) -> Result<i64, GatewayError> {
    raw.parse().map_err(|_| GatewayError::InvalidId)
}

pub async fn list(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<Customer>>, GatewayError> {
    let api = state.api.clone();
    let customers = blocking(move || api.list_customers(&token)).await??;
    Ok(Json(customers))
}

pub async fn create(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    body: Bytes,
) -> Result<(StatusCode, Json<Customer>), GatewayError> {
    let (name, email) = parse_json::<CustomerPayload>(&body)?.into_fields()?;

    let api = state.api.clone();
    let created = blocking(move || api.create_customer(&token, &name, &email)).await??;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Customer>, GatewayError> {
    let id = parse_id(&raw_id)?;
    let (name, email) = parse_json::<CustomerPayload>(&body)?.into_fields()?;

    let api = state.api.clone();
    let updated = blocking(move || api.update_customer(&token, id, &name, &email)).await??;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, GatewayError> {
    let id = parse_id(&raw_id)?;

    let api = state.api.clone();
    blocking(move || api.delete_customer(&token, id)).await??;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT or DELETE on a path with no single id segment to act on.
pub async fn missing_id(BearerToken(_): BearerToken) -> GatewayError {
    GatewayError::InvalidId
}

pub async fn options() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ALLOW, ALLOW),
            (ACCESS_CONTROL_ALLOW_METHODS, ALLOW),
            (ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
    )
}

pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed { allow: ALLOW }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(GatewayError::InvalidId)));
        assert!(matches!(parse_id("4.2"), Err(GatewayError::InvalidId)));
    }

    #[test]
    fn payload_fields_are_trimmed_and_required() {
        let payload = CustomerPayload {
            name: "  Alice ".to_string(),
            email: "alice@example.com\n".to_string(),
        };
        assert_eq!(
            payload.into_fields().unwrap(),
            ("Alice".to_string(), "alice@example.com".to_string())
        );

        let payload = CustomerPayload {
            name: "Alice".to_string(),
            email: "   ".to_string(),
        };
        assert!(matches!(payload.into_fields(), Err(GatewayError::BadRequest(_))));
    }
}
