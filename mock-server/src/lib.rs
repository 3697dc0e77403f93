//! In-memory stand-in for the upstream customer API.
//!
//! Issues random bearer tokens on `/login` and guards the `/customers`
//! family with them. Customers get sequential integer ids starting at 1.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// Accounts accepted by `/login`.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub users: Vec<(String, String)>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            users: vec![("admin".to_string(), "admin123".to_string())],
        }
    }
}

#[derive(Default)]
pub struct Store {
    customers: BTreeMap<i64, Customer>,
    next_id: i64,
    tokens: HashSet<String>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct MockState {
    users: Arc<Vec<(String, String)>>,
    db: Db,
}

type ApiResult<T> = Result<T, Response>;

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn app() -> Router {
    app_with_config(MockConfig::default())
}

pub fn app_with_config(config: MockConfig) -> Router {
    let state = MockState {
        users: Arc::new(config.users),
        db: Arc::new(RwLock::new(Store::default())),
    };

    let customers = Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{id}", put(update_customer).delete(delete_customer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/login", post(login))
        .merge(customers)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn login(State(state): State<MockState>, Json(input): Json<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
    let known = state
        .users
        .iter()
        .any(|(user, pass)| *user == input.username && *pass == input.password);
    if !known {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    let token = Uuid::new_v4().simple().to_string();
    state.db.write().await.tokens.insert(token.clone());
    tracing::info!(username = %input.username, "issued token");

    Ok(Json(LoginResponse {
        token,
        username: input.username,
    }))
}

async fn require_token(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let authorized = match token {
        Some(token) => state.db.read().await.tokens.contains(&token),
        None => false,
    };
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    next.run(request).await
}

async fn list_customers(State(state): State<MockState>) -> Json<Vec<Customer>> {
    let store = state.db.read().await;
    Json(store.customers.values().cloned().collect())
}

fn validate(input: &CustomerInput) -> ApiResult<()> {
    if input.name.trim().is_empty() || input.email.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Name and email are required"));
    }
    Ok(())
}

fn email_taken(store: &Store, email: &str, except: Option<i64>) -> bool {
    store
        .customers
        .values()
        .any(|c| c.email.eq_ignore_ascii_case(email) && Some(c.id) != except)
}

async fn create_customer(
    State(state): State<MockState>,
    Json(input): Json<CustomerInput>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    validate(&input)?;
    let mut store = state.db.write().await;
    if email_taken(&store, &input.email, None) {
        return Err(error(StatusCode::CONFLICT, "Email already registered"));
    }

    store.next_id += 1;
    let customer = Customer {
        id: store.next_id,
        name: input.name,
        email: input.email,
    };
    store.customers.insert(customer.id, customer.clone());
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(input): Json<CustomerInput>,
) -> ApiResult<Json<Customer>> {
    validate(&input)?;
    let mut store = state.db.write().await;
    if !store.customers.contains_key(&id) {
        return Err(error(StatusCode::NOT_FOUND, "Customer not found"));
    }
    if email_taken(&store, &input.email, Some(id)) {
        return Err(error(StatusCode::CONFLICT, "Email already registered"));
    }

    let customer = Customer {
        id,
        name: input.name,
        email: input.email,
    };
    store.customers.insert(id, customer.clone());
    Ok(Json(customer))
}

async fn delete_customer(State(state): State<MockState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = state.db.write().await;
    store
        .customers
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Customer not found"))
}
