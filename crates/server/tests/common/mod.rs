//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock collaborators injected, enabling API testing without a ticket
//! system or status endpoints.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use shipready_core::{
    testing::{ManualClock, MockStatusCheck, MockTicketQuery},
    Config, DatabaseConfig, PrepCatalog, PrepItemStore, ResolverEngine, SqlitePrepRepository,
};
use shipready_server::state::AppState;

/// Re-export fixtures for test convenience
pub use shipready_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Ticket queries (MockTicketQuery)
/// - Status endpoints (MockStatusCheck)
/// - Time (ManualClock)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_toggle() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/prep-items/manual/toggle", json!({})).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub state: Arc<AppState>,
    /// Mock ticket system - configure returned tickets
    pub tickets: Arc<MockTicketQuery>,
    /// Mock status endpoints - configure reported statuses
    pub status: Arc<MockStatusCheck>,
    pub clock: ManualClock,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture over the `manual` / `jira` / `api` catalog.
    pub async fn new() -> Self {
        Self::with_catalog(fixtures::mixed_catalog()).await
    }

    pub async fn with_catalog(catalog: PrepCatalog) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        // Create mocks
        let tickets = Arc::new(MockTicketQuery::new());
        let status = Arc::new(MockStatusCheck::new());
        let clock = ManualClock::fixed();

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            ..Default::default()
        };

        let repository = Arc::new(
            SqlitePrepRepository::new(&db_path, config.readiness.record_key.clone())
                .expect("Failed to create repository"),
        );
        let resolver = ResolverEngine::new()
            .with_ticket_query(tickets.clone())
            .with_status_check(status.clone());
        let store = Arc::new(
            PrepItemStore::open(catalog, repository, resolver, Arc::new(clock.clone())).await,
        );

        let state = Arc::new(AppState::new(config, store));
        let router = shipready_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            tickets,
            status,
            clock,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
