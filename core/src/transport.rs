//! Request shaping and response normalization for the upstream API.
//!
//! # Design
//! `Transport` holds only a base URL and an executor; it never holds a
//! token. An authenticated transport is a different type (`Session`), so
//! "logged in" is something the compiler checks rather than a flag read at
//! runtime. Each round trip is split into `build_request` and
//! `parse_response`, and `request` glues the two around the executor.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
use crate::session::Session;
use crate::types::Token;

/// Status code and parsed JSON body of a successful (2xx) response.
///
/// `body` is `None` when the upstream sent nothing (e.g. 204).
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    /// Deserialize the body into `T`. A missing body is a decoding error.
    pub fn into_json<T: DeserializeOwned>(self) -> ClientResult<T> {
        let body = self
            .body
            .ok_or_else(|| ClientError::Decoding("response body was empty".to_string()))?;
        serde_json::from_value(body).map_err(|e| ClientError::Decoding(e.to_string()))
    }
}

/// Unauthenticated handle on the upstream API.
#[derive(Debug, Clone)]
pub struct Transport<X = UreqExecutor> {
    base_url: String,
    executor: X,
}

impl Transport<UreqExecutor> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_executor(&config.base_url, UreqExecutor::new(config))
    }
}

impl<X: HttpExecutor> Transport<X> {
    pub fn with_executor(base_url: &str, executor: X) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            executor,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install `token`, turning this transport into a `Session`.
    pub fn authenticate(self, token: Token) -> Session<X> {
        Session::new(self, token)
    }

    /// Unauthenticated round trip against `base_url + path`.
    pub fn request<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> ClientResult<Reply>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body, None)
    }

    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        token: Option<&Token>,
    ) -> ClientResult<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ClientError::Serialization(e.to_string()))?;

        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("authorization".to_string(), format!("Bearer {}", token.as_str())));
        }

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        })
    }

    pub(crate) fn send<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        token: Option<&Token>,
    ) -> ClientResult<Reply>
    where
        B: Serialize + ?Sized,
    {
        parse_response(self.exchange(method, path, body, token)?)
    }

    /// One round trip, returning the raw response whatever its status.
    pub(crate) fn exchange<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        token: Option<&Token>,
    ) -> ClientResult<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, body, token)?;
        tracing::debug!(%method, url = %request.url, "sending upstream request");

        let response = self.executor.execute(request).inspect_err(|e| {
            tracing::debug!(%method, path, error = %e, "upstream unreachable");
        })?;
        tracing::debug!(%method, path, status = response.status, "upstream responded");

        Ok(response)
    }
}

/// Like `parse_response`, but a 2xx body is never read.
pub fn check_status(response: HttpResponse) -> ClientResult<u16> {
    if !(200..300).contains(&response.status) {
        return Err(api_error(response.status, &response.body));
    }
    Ok(response.status)
}

/// Normalize a raw response: 2xx becomes a `Reply`, anything else an
/// `Api` error carrying the upstream's message.
pub fn parse_response(response: HttpResponse) -> ClientResult<Reply> {
    if !(200..300).contains(&response.status) {
        return Err(api_error(response.status, &response.body));
    }

    let body = if response.body.trim().is_empty() {
        None
    } else {
        let value =
            serde_json::from_str(&response.body).map_err(|e| ClientError::Decoding(e.to_string()))?;
        Some(value)
    };

    Ok(Reply {
        status: response.status,
        body,
    })
}

/// Build an `Api` error, preferring the upstream's own message.
fn api_error(status: u16, body: &str) -> ClientError {
    let message = upstream_message(body)
        .unwrap_or_else(|| format!("upstream request failed with status {status}"));
    ClientError::Api { status, message }
}

/// `error` field, then `message` field, then the raw body.
fn upstream_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = fields.get(key) {
                if !message.is_empty() {
                    return Some(message.clone());
                }
            }
        }
    }
    Some(body.to_string())
}
