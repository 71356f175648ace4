#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use clientele::db::Database;
use clientele::sync::RemoteConfig;
use clientele::{ServerConfig, create_app};
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret-which-is-long-enough";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
}

pub async fn setup() -> TestApp {
    setup_with(86_400_000, None).await
}

pub async fn setup_with(token_lifetime_ms: u64, remote: Option<RemoteConfig>) -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");

    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: JWT_SECRET.to_vec(),
        token_lifetime_ms,
        remote,
    };

    TestApp {
        app: create_app(&config),
        db,
    }
}

impl TestApp {
    /// Send one request through the router and return status plus parsed
    /// JSON body (Null for empty bodies).
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not valid JSON")
        };

        (status, json)
    }

    /// Send a request with a raw Authorization header value.
    pub async fn request_with_header(
        &self,
        method: &str,
        path: &str,
        authorization: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not valid JSON")
        };

        (status, json)
    }

    /// Register a customer, asserting success. Returns the customer view.
    pub async fn register(&self, email: &str, password: &str) -> serde_json::Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                    "first_name": "Test",
                    "last_name": "Customer",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }

    /// Register and log in, returning a bearer token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        self.register(email, password).await;
        self.login(email, password).await
    }

    /// Log in, asserting success. Returns the token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }
}
