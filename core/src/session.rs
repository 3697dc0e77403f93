//! An authenticated transport.

use serde::Serialize;

use crate::error::ClientResult;
use crate::http::{HttpExecutor, HttpMethod, UreqExecutor};
use crate::transport::{check_status, Reply, Transport};
use crate::types::Token;

/// A `Transport` paired with exactly one bearer token.
///
/// Every request made through a session carries `Authorization: Bearer`.
/// There is no logout and no refresh: a new session means a new
/// `Transport` and a new login.
#[derive(Debug, Clone)]
pub struct Session<X = UreqExecutor> {
    transport: Transport<X>,
    token: Token,
}

impl<X: HttpExecutor> Session<X> {
    pub fn new(transport: Transport<X>, token: Token) -> Self {
        Self { transport, token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn transport(&self) -> &Transport<X> {
        &self.transport
    }

    /// Replace the installed token.
    pub fn set_token(&mut self, token: Token) {
        self.token = token;
    }

    /// Authenticated round trip against `base_url + path`.
    pub fn request<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> ClientResult<Reply>
    where
        B: Serialize + ?Sized,
    {
        self.transport.send(method, path, body, Some(&self.token))
    }

    /// Authenticated round trip where only the status matters; a 2xx body
    /// is not decoded.
    pub fn request_status<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> ClientResult<u16>
    where
        B: Serialize + ?Sized,
    {
        check_status(self.transport.exchange(method, path, body, Some(&self.token))?)
    }
}
