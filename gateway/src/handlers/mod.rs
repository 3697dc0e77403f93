pub mod assets;
pub mod auth;
pub mod customers;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Run a blocking core call on the blocking pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("blocking task failed: {e}");
        GatewayError::Internal
    })
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|_| GatewayError::BadRequest("Invalid JSON body".to_string()))
}
