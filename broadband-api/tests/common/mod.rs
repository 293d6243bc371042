//! Common test utilities for integration tests
//!
//! Builds the full router over an in-memory store and a throwaway upload
//! directory, plus helpers for issuing JSON and multipart requests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use broadband_api::app::{build_router, AppState};
use broadband_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, UploadConfig};
use broadband_shared::store::memory::MemoryStore;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub const CUSTOMER_MOBILE: &str = "9876543210";
pub const CUSTOMER_PASSWORD: &str = "password";
pub const ENGINEER_MOBILE: &str = "8888888888";
pub const ENGINEER_PASSWORD: &str = "engineer";

const BOUNDARY: &str = "broadband-test-boundary";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
    pub config: Config,
    pub upload_dir: PathBuf,
}

/// One part of a multipart form
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_max_upload(2 * 1024 * 1024)
    }

    pub fn with_max_upload(max_file_size: usize) -> Self {
        let upload_dir = std::env::temp_dir().join(format!("broadband-api-test-{}", Uuid::new_v4()));

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
                access_token_expire_minutes: 60,
            },
            uploads: UploadConfig {
                dir: upload_dir.clone(),
                max_file_size,
            },
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());
        let app = build_router(state);

        TestContext {
            store,
            app,
            config,
            upload_dir,
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, token, body)).await
    }

    pub async fn patch_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PATCH", uri, token, body)).await
    }

    pub async fn post_multipart(&self, uri: &str, token: Option<&str>, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = request("POST", uri, token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    /// Registers a user and returns the response body
    pub async fn register(&self, mobile: &str, password: &str, role: &str) -> Value {
        let (status, body) = self
            .post_json(
                "/api/auth/register",
                None,
                serde_json::json!({
                    "mobile": mobile,
                    "name": format!("User {}", mobile),
                    "password": password,
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }

    /// Logs in and returns the access token
    pub async fn login(&self, mobile: &str, password: &str, role: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/auth/login",
                None,
                serde_json::json!({ "mobile": mobile, "password": password, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Registers the demo customer and returns `(user_id, token)`
    pub async fn customer(&self) -> (String, String) {
        let user = self.register(CUSTOMER_MOBILE, CUSTOMER_PASSWORD, "customer").await;
        let token = self.login(CUSTOMER_MOBILE, CUSTOMER_PASSWORD, "customer").await;
        (user["id"].as_str().unwrap().to_string(), token)
    }

    /// Registers the demo engineer and returns a token
    pub async fn engineer(&self) -> String {
        self.register(ENGINEER_MOBILE, ENGINEER_PASSWORD, "engineer").await;
        self.login(ENGINEER_MOBILE, ENGINEER_PASSWORD, "engineer").await
    }

    /// Creates a bill through the API as `engineer_token`
    pub async fn create_bill(&self, engineer_token: &str, user_id: &str, month: &str, status: &str) -> Value {
        let (code, body) = self
            .post_json(
                "/api/bills",
                Some(engineer_token),
                serde_json::json!({
                    "user_id": user_id,
                    "month": month,
                    "amount": 1179.0,
                    "due_date": "2024-12-05",
                    "status": status,
                }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "create bill failed: {}", body);
        body
    }

    /// Files a task with only the required text fields
    pub async fn create_task(&self, engineer_token: &str, name: &str, mobile: &str) -> Value {
        let (code, body) = self
            .post_multipart(
                "/api/tasks",
                Some(engineer_token),
                &task_parts(name, mobile),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "create task failed: {}", body);
        body
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Required text fields for a task form
pub fn task_parts<'a>(name: &'a str, mobile: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("name", name),
        Part::Text("mobile", mobile),
        Part::Text("address", "E-301, Prestige Towers, Whitefield, Bengaluru"),
        Part::Text("plan", "1 Gbps Premium"),
        Part::Text("initial_password", "welcome123"),
    ]
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File { field, filename, data } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        field, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
