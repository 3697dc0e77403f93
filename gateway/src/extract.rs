//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use customer_core::Token;

use crate::error::GatewayError;

/// The caller's bearer token, taken from `Authorization: Bearer <token>`.
///
/// Everything after `Bearer ` is forwarded untouched. Rejects with 401
/// before any upstream call when the header is missing, uses another
/// scheme, or carries an empty token.
#[derive(Debug)]
pub struct BearerToken(pub Token);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(|token| BearerToken(Token::new(token)))
            .ok_or(GatewayError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(header: Option<&str>) -> Result<BearerToken, GatewayError> {
        let mut builder = Request::builder().uri("/api/customers");
        if let Some(header) = header {
            builder = builder.header(AUTHORIZATION, header);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn accepts_bearer_scheme() {
        let BearerToken(token) = extract(Some("Bearer abc123")).await.unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[tokio::test]
    async fn rejects_missing_other_scheme_and_empty() {
        for header in [None, Some("Basic YWRtaW4="), Some("Bearer "), Some("bearer abc")] {
            let err = extract(header).await.unwrap_err();
            assert!(matches!(err, GatewayError::MissingToken), "{header:?}");
        }
    }

    #[tokio::test]
    async fn token_is_forwarded_verbatim() {
        let BearerToken(token) = extract(Some("Bearer  abc")).await.unwrap();
        assert_eq!(token.as_str(), " abc");
    }
}
