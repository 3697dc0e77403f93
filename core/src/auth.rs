//! Login against the upstream API.

use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::http::{HttpExecutor, HttpMethod};
use crate::transport::Transport;
use crate::types::{Credentials, Token};

pub const LOGIN_PATH: &str = "/login";

const MALFORMED_LOGIN_RESPONSE: &str = "malformed login response";

/// Exchanges credentials for a session token.
///
/// Borrows an unauthenticated `Transport`, so login can never be issued
/// from a transport that already carries a token. Stores nothing.
#[derive(Debug)]
pub struct AuthService<'a, X> {
    transport: &'a Transport<X>,
}

impl<'a, X: HttpExecutor> AuthService<'a, X> {
    pub fn new(transport: &'a Transport<X>) -> Self {
        Self { transport }
    }

    /// POST the credentials once and return the issued token.
    ///
    /// Rejected credentials surface as the upstream's `Api` error (usually
    /// 401). A 2xx reply without a non-empty string `token` is `Auth`.
    pub fn login(&self, username: &str, password: &str) -> ClientResult<Token> {
        let credentials = Credentials::new(username, password);
        let reply = self
            .transport
            .request(HttpMethod::Post, LOGIN_PATH, Some(&credentials))?;

        let token = match reply.body {
            Some(Value::Object(mut fields)) => match fields.remove("token") {
                Some(Value::String(token)) if !token.is_empty() => token,
                _ => return Err(ClientError::Auth(MALFORMED_LOGIN_RESPONSE.to_string())),
            },
            _ => return Err(ClientError::Auth(MALFORMED_LOGIN_RESPONSE.to_string())),
        };

        tracing::debug!("login succeeded");
        Ok(Token::new(token))
    }
}
