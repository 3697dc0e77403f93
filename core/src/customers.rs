//! Customer CRUD against the upstream API.

use crate::error::ClientResult;
use crate::http::{HttpExecutor, HttpMethod};
use crate::session::Session;
use crate::types::{Customer, CustomerInput};

pub const CUSTOMERS_PATH: &str = "/customers";

/// Stateless CRUD operations over an authenticated `Session`.
///
/// Inputs are passed through unvalidated; callers check for empty fields.
/// Every error comes straight from the transport.
#[derive(Debug)]
pub struct CustomerService<'a, X> {
    session: &'a Session<X>,
}

impl<'a, X: HttpExecutor> CustomerService<'a, X> {
    pub fn new(session: &'a Session<X>) -> Self {
        Self { session }
    }

    /// All customers. An empty collection (or an empty body) is `Ok(vec![])`.
    pub fn list(&self) -> ClientResult<Vec<Customer>> {
        let reply = self
            .session
            .request(HttpMethod::Get, CUSTOMERS_PATH, None::<&()>)?;
        if reply.body.is_none() {
            return Ok(Vec::new());
        }
        reply.into_json()
    }

    pub fn create(&self, name: &str, email: &str) -> ClientResult<Customer> {
        let input = CustomerInput::new(name, email);
        self.session
            .request(HttpMethod::Post, CUSTOMERS_PATH, Some(&input))?
            .into_json()
    }

    pub fn update(&self, id: i64, name: &str, email: &str) -> ClientResult<Customer> {
        let input = CustomerInput::new(name, email);
        self.session
            .request(HttpMethod::Put, &customer_path(id), Some(&input))?
            .into_json()
    }

    /// Success is any 2xx status; the response body is never parsed.
    pub fn delete(&self, id: i64) -> ClientResult<()> {
        self.session
            .request_status(HttpMethod::Delete, &customer_path(id), None::<&()>)?;
        Ok(())
    }
}

fn customer_path(id: i64) -> String {
    format!("{CUSTOMERS_PATH}/{id}")
}
