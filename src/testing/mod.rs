//! Test harness: an in-memory store, row fixtures and a router driver.

pub mod fixtures;
pub mod memory;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{issue_session_token, Claims};
use crate::config::AppConfig;
use crate::database::models::UserInfo;
use crate::state::AppState;

pub use memory::MemoryDb;

pub const TEST_SECRET: &str = "router-test-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.api.enable_request_logging = false;
    config
}

/// A router over an in-memory store with one tenant and one member.
pub struct TestApp {
    pub db: MemoryDb,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    router: Router,
    config: AppConfig,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = MemoryDb::new();
        let tenant_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        db.tables.write().await.users.push(UserInfo {
            user_id,
            tenant_id,
            email: Some("owner@example.com".to_string()),
            full_name: Some("Owner".to_string()),
            roles: vec!["admin".to_string()],
            permissions: vec!["*".to_string()],
        });

        let config = test_config();
        let router = crate::app(AppState::new(config.clone(), Some(db.store())));
        Self {
            db,
            tenant_id,
            user_id,
            router,
            config,
        }
    }

    /// Router with no database client at all.
    pub fn without_store() -> Router {
        crate::app(AppState::new(test_config(), None))
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        token(&self.config, user_id)
    }

    pub fn token(&self) -> String {
        self.token_for(self.user_id)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(self.token())).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), Some(self.token())).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), Some(self.token())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, Some(self.token())).await
    }

    pub async fn public_get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn public_post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, token: Option<String>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body, token).await
    }
}

pub fn token(config: &AppConfig, user_id: Uuid) -> String {
    let claims = Claims::new(user_id, None, &config.security);
    issue_session_token(&claims, &config.security).expect("token")
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
