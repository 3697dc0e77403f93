use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{blocking, parse_json};
use crate::error::GatewayError;
use crate::state::AppState;

pub const ALLOW: &str = "POST";

/// Missing fields are read as empty strings and left to the upstream.
#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<TokenResponse>, GatewayError> {
    let payload: LoginPayload = parse_json(&body)?;

    let api = state.api.clone();
    let token = blocking(move || api.login(&payload.username, &payload.password))
        .await?
        .map_err(GatewayError::from_login)?;

    Ok(Json(TokenResponse {
        token: token.into_inner(),
    }))
}

pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed { allow: ALLOW }
}
