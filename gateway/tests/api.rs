use std::collections::BTreeMap;
use std::sync::Mutex;

use axum::http::{self, header, Request, StatusCode};
use axum::Router;
use customer_core::{ClientError, ClientResult, Customer, CustomerApi, Token};
use customer_gateway::{app, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "abc123";

/// In-memory `CustomerApi` that answers the way the upstream does.
#[derive(Default)]
struct FakeApi {
    customers: Mutex<BTreeMap<i64, Customer>>,
    offline: bool,
}

impl FakeApi {
    fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn check(&self, token: &Token) -> ClientResult<()> {
        if self.offline {
            return Err(ClientError::Connectivity("connection refused".into()));
        }
        if token.as_str() != TOKEN {
            return Err(ClientError::Api {
                status: 401,
                message: "Missing or invalid token".into(),
            });
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "Customer not found".into(),
        }
    }
}

impl CustomerApi for FakeApi {
    fn login(&self, username: &str, password: &str) -> ClientResult<Token> {
        if self.offline {
            return Err(ClientError::Connectivity("connection refused".into()));
        }
        match (username, password) {
            ("admin", "admin123") => Ok(Token::new(TOKEN)),
            ("broken", _) => Err(ClientError::Auth("malformed login response".into())),
            _ => Err(ClientError::Api {
                status: 401,
                message: "Invalid credentials".into(),
            }),
        }
    }

    fn list_customers(&self, token: &Token) -> ClientResult<Vec<Customer>> {
        self.check(token)?;
        Ok(self.customers.lock().unwrap().values().cloned().collect())
    }

    fn create_customer(&self, token: &Token, name: &str, email: &str) -> ClientResult<Customer> {
        self.check(token)?;
        let mut customers = self.customers.lock().unwrap();
        let id = customers.keys().next_back().copied().unwrap_or(0) + 1;
        let customer = Customer {
            id: Some(id),
            name: name.to_string(),
            email: email.to_string(),
        };
        customers.insert(id, customer.clone());
        Ok(customer)
    }

    fn update_customer(&self, token: &Token, id: i64, name: &str, email: &str) -> ClientResult<Customer> {
        self.check(token)?;
        let mut customers = self.customers.lock().unwrap();
        let customer = customers.get_mut(&id).ok_or_else(Self::not_found)?;
        customer.name = name.to_string();
        customer.email = email.to_string();
        Ok(customer.clone())
    }

    fn delete_customer(&self, token: &Token, id: i64) -> ClientResult<()> {
        self.check(token)?;
        self.customers
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }
}

fn gateway() -> Router {
    app(AppState::new(FakeApi::default()))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if !body.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    builder.body(body.to_string()).unwrap()
}

async fn send(app: &Router, request: Request<String>) -> http::Response<axum::body::Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: http::Response<axum::body::Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: http::Response<axum::body::Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// --- login ---

#[tokio::test]
async fn login_returns_token() {
    let resp = send(
        &gateway(),
        request("POST", "/api/login", None, r#"{"username":"admin","password":"admin123"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"token": TOKEN}));
}

#[tokio::test]
async fn login_rejection_is_401_with_upstream_message() {
    let resp = send(
        &gateway(),
        request("POST", "/api/login", None, r#"{"username":"admin","password":"nope"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"error": "Invalid credentials"}));
}

#[tokio::test]
async fn login_with_malformed_upstream_reply_is_401() {
    let resp = send(
        &gateway(),
        request("POST", "/api/login", None, r#"{"username":"broken","password":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("malformed login response"));
}

#[tokio::test]
async fn login_missing_fields_are_forwarded_as_empty() {
    let resp = send(&gateway(), request("POST", "/api/login", None, "{}")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_invalid_json_is_400() {
    let resp = send(&gateway(), request("POST", "/api/login", None, "username=admin")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"error": "Invalid JSON body"}));
}

#[tokio::test]
async fn login_only_accepts_post() {
    let resp = send(&gateway(), request("GET", "/api/login", None, "")).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[header::ALLOW], "POST");
    assert_eq!(body_json(resp).await, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn login_when_upstream_is_down_is_500() {
    let app = app(AppState::new(FakeApi::offline()));
    let resp = send(
        &app,
        request("POST", "/api/login", None, r#"{"username":"admin","password":"admin123"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- customers: auth ---

#[tokio::test]
async fn customers_without_bearer_are_401() {
    let app = gateway();
    for (method, uri) in [
        ("GET", "/api/customers"),
        ("POST", "/api/customers"),
        ("PUT", "/api/customers/1"),
        ("DELETE", "/api/customers/1"),
    ] {
        let resp = send(&app, request(method, uri, None, "")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(
            body_json(resp).await,
            json!({"error": "Missing or invalid Authorization header"})
        );
    }
}

#[tokio::test]
async fn stale_token_is_401_from_upstream() {
    let resp = send(&gateway(), request("GET", "/api/customers", Some("stale"), "")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"error": "Missing or invalid token"}));
}

// --- customers: ids and payloads ---

#[tokio::test]
async fn malformed_id_is_400() {
    let app = gateway();
    let resp = send(
        &app,
        request("PUT", "/api/customers/abc", Some(TOKEN), r#"{"name":"A","email":"a@x.io"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"error": "Invalid customer id"}));

    let resp = send(&app, request("DELETE", "/api/customers/1.5", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_or_delete_without_id_is_400() {
    let app = gateway();
    for method in ["PUT", "DELETE"] {
        let resp = send(&app, request(method, "/api/customers", Some(TOKEN), "")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(body_json(resp).await, json!({"error": "Invalid customer id"}));
    }
}

#[tokio::test]
async fn trailing_slash_and_nested_paths_have_no_usable_id() {
    let app = gateway();
    for uri in ["/api/customers/", "/api/customers/1/extra", "/api/customers/abc/def/ghi"] {
        for method in ["PUT", "DELETE"] {
            let resp = send(&app, request(method, uri, Some(TOKEN), "")).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(body_json(resp).await, json!({"error": "Invalid customer id"}));

            let resp = send(&app, request(method, uri, None, "")).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri} without token");
        }
    }
}

#[tokio::test]
async fn trailing_slash_lists_customers() {
    let resp = send(&gateway(), request("GET", "/api/customers/", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn blank_fields_are_rejected_before_upstream() {
    let resp = send(
        &gateway(),
        request("POST", "/api/customers", Some(TOKEN), r#"{"name":"  ","email":"a@x.io"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"error": "Name and email are required"}));
}

#[tokio::test]
async fn update_unknown_id_keeps_upstream_404() {
    let resp = send(
        &gateway(),
        request("PUT", "/api/customers/42", Some(TOKEN), r#"{"name":"A","email":"a@x.io"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"error": "Customer not found"}));
}

#[tokio::test]
async fn upstream_outage_is_500() {
    let app = app(AppState::new(FakeApi::offline()));
    let resp = send(&app, request("GET", "/api/customers", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

// --- customers: methods ---

#[tokio::test]
async fn options_answers_with_cors_headers() {
    let app = gateway();
    let resp = send(&app, request("OPTIONS", "/api/customers", None, "")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()[header::ALLOW], "GET, POST, PUT, DELETE, OPTIONS");
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );

    for uri in ["/api/customers/7", "/api/customers/"] {
        let resp = send(&app, request("OPTIONS", uri, None, "")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{uri}");
        assert_eq!(resp.headers()[header::ALLOW], "GET, POST, PUT, DELETE, OPTIONS");
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
    }
}

#[tokio::test]
async fn unsupported_methods_are_405() {
    let app = gateway();
    let resp = send(&app, request("PATCH", "/api/customers", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[header::ALLOW], "GET, POST, PUT, DELETE, OPTIONS");

    let resp = send(&app, request("GET", "/api/customers/1", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[header::ALLOW], "GET, POST, PUT, DELETE, OPTIONS");
}

// --- customers: lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = gateway();

    let resp = send(&app, request("GET", "/api/customers", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));

    let resp = send(
        &app,
        request(
            "POST",
            "/api/customers",
            Some(TOKEN),
            r#"{"name":" Alice ","email":"alice@example.com"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(resp).await,
        json!({"id": 1, "name": "Alice", "email": "alice@example.com"})
    );

    let resp = send(
        &app,
        request(
            "PUT",
            "/api/customers/1",
            Some(TOKEN),
            r#"{"id":99,"name":"Alice B","email":"alice@example.com"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"id": 1, "name": "Alice B", "email": "alice@example.com"})
    );

    let resp = send(&app, request("DELETE", "/api/customers/1", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_text(resp).await.is_empty());

    let resp = send(&app, request("DELETE", "/api/customers/1", Some(TOKEN), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, request("GET", "/api/customers", Some(TOKEN), "")).await;
    assert_eq!(body_json(resp).await, json!([]));
}

// --- static assets ---

#[tokio::test]
async fn root_serves_index() {
    let resp = send(&gateway(), request("GET", "/", None, "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert!(body_text(resp).await.contains("<title>Customers</title>"));
}

#[tokio::test]
async fn assets_get_content_type_from_extension() {
    let app = gateway();
    let resp = send(&app, request("GET", "/styles.css", None, "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");

    let resp = send(&app, request("GET", "/app.js", None, "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.contains("javascript"), "{content_type}");
}

#[tokio::test]
async fn unknown_asset_is_404() {
    let resp = send(&gateway(), request("GET", "/missing.png", None, "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"error": "Not found"}));
}

#[tokio::test]
async fn assets_are_read_only() {
    let resp = send(&gateway(), request("POST", "/index.html", None, "")).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[header::ALLOW], "GET");
}
