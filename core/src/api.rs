//! The capability set both front ends program against.
//!
//! # Design
//! The token is threaded through every call as an immutable value instead
//! of living inside a shared client, so one `RemoteApi` can sit behind an
//! `Arc` and serve any number of concurrent callers, each with its own
//! token. Tests swap in an in-memory implementation.

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::customers::CustomerService;
use crate::error::ClientResult;
use crate::http::{HttpExecutor, UreqExecutor};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{Customer, Token};

pub trait CustomerApi: Send + Sync {
    fn login(&self, username: &str, password: &str) -> ClientResult<Token>;

    fn list_customers(&self, token: &Token) -> ClientResult<Vec<Customer>>;

    fn create_customer(&self, token: &Token, name: &str, email: &str) -> ClientResult<Customer>;

    fn update_customer(&self, token: &Token, id: i64, name: &str, email: &str) -> ClientResult<Customer>;

    fn delete_customer(&self, token: &Token, id: i64) -> ClientResult<()>;
}

/// `CustomerApi` over the real upstream.
///
/// Holds an unauthenticated `Transport`; each CRUD call builds a fresh
/// `Session` from a clone of it plus the caller's token.
#[derive(Debug, Clone)]
pub struct RemoteApi<X = UreqExecutor> {
    transport: Transport<X>,
}

impl RemoteApi<UreqExecutor> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::from_transport(Transport::new(config))
    }
}

impl<X: HttpExecutor + Clone> RemoteApi<X> {
    pub fn from_transport(transport: Transport<X>) -> Self {
        Self { transport }
    }

    fn session(&self, token: &Token) -> Session<X> {
        self.transport.clone().authenticate(token.clone())
    }
}

impl<X> CustomerApi for RemoteApi<X>
where
    X: HttpExecutor + Clone + Send + Sync,
{
    fn login(&self, username: &str, password: &str) -> ClientResult<Token> {
        AuthService::new(&self.transport).login(username, password)
    }

    fn list_customers(&self, token: &Token) -> ClientResult<Vec<Customer>> {
        CustomerService::new(&self.session(token)).list()
    }

    fn create_customer(&self, token: &Token, name: &str, email: &str) -> ClientResult<Customer> {
        CustomerService::new(&self.session(token)).create(name, email)
    }

    fn update_customer(&self, token: &Token, id: i64, name: &str, email: &str) -> ClientResult<Customer> {
        CustomerService::new(&self.session(token)).update(id, name, email)
    }

    fn delete_customer(&self, token: &Token, id: i64) -> ClientResult<()> {
        CustomerService::new(&self.session(token)).delete(id)
    }
}
