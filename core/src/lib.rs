//! Blocking API client core for the customer-management service.
//!
//! # Overview
//! Acquires a bearer token, shapes login and customer CRUD requests, and
//! normalizes every upstream failure into one `ClientError` that a terminal
//! message or an HTTP error body can be built from.
//!
//! # Design
//! - `Transport` is unauthenticated by construction; `Session` is a
//!   `Transport` plus exactly one `Token`. Login borrows a `Transport`,
//!   CRUD borrows a `Session`, so "CRUD without a token" does not compile.
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`);
//!   an `HttpExecutor` performs the round trip (`ureq` in production).
//! - `CustomerApi` is the capability set the front ends depend on;
//!   `RemoteApi` implements it with the token passed per call.
//! - Configuration is an explicit `ClientConfig` value; nothing here reads
//!   the environment unless a host asks via `ClientConfig::from_env`.

pub mod api;
pub mod auth;
pub mod config;
pub mod customers;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use api::{CustomerApi, RemoteApi};
pub use auth::AuthService;
pub use config::{ClientConfig, ConfigError};
pub use customers::CustomerService;
pub use error::{ClientError, ClientResult};
pub use http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
pub use session::Session;
pub use transport::{check_status, parse_response, Reply, Transport};
pub use types::{Credentials, Customer, CustomerInput, Token};
