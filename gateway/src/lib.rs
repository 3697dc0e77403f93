//! HTTP gateway (backend-for-frontend) for the customer API.
//!
//! # Overview
//! Serves the embedded web client and re-exposes login and customer CRUD
//! under `/api`, forwarding each call through a `CustomerApi`.
//!
//! # Design
//! - The core is blocking; handlers run it on the blocking pool and the
//!   token travels with each request, so no request shares mutable state
//!   with another.
//! - Failures render as `{"error": "..."}` through `GatewayError`.
//! - `AppState` holds `Arc<dyn CustomerApi>`; tests plug in fakes.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{GatewayConfig, GatewayConfigError};
pub use error::GatewayError;
pub use state::AppState;

use handlers::{assets, auth, customers};

pub fn app(state: AppState) -> Router {
    // `/api/customers/` (trailing slash) behaves like the collection; any
    // deeper path has no usable id.
    let collection = get(customers::list)
        .post(customers::create)
        .put(customers::missing_id)
        .delete(customers::missing_id)
        .options(customers::options)
        .fallback(customers::method_not_allowed);

    Router::new()
        .route("/api/login", post(auth::login).fallback(auth::method_not_allowed))
        .route("/api/customers", collection.clone())
        .route("/api/customers/", collection)
        .route(
            "/api/customers/{id}",
            put(customers::update)
                .delete(customers::delete)
                .options(customers::options)
                .fallback(customers::method_not_allowed),
        )
        .route(
            "/api/customers/{id}/{*rest}",
            put(customers::missing_id)
                .delete(customers::missing_id)
                .options(customers::options)
                .fallback(customers::method_not_allowed),
        )
        .fallback(assets::serve)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
