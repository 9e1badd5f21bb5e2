//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing. Use it to stand in for congress.gov or the ZIP lookup in
//! integration tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/house-vote/119/2")
//!         .with_query("api_key", "test-key")
//!         .respond_with_json(json!({"houseRollCallVotes": []}))
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(503)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` to assert call count

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running stub server.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    /// Start a server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL, without a trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Begin stubbing a `GET` to `route`.
    pub fn expect_get(&self, route: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: &self.server,
            mock: Mock::given(method("GET")).and(path(route)),
            status: 200,
            body: None,
            delay: None,
            expected_calls: None,
        }
    }

    /// Number of requests the server has seen.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

enum StubBody {
    Json(Value),
    Text(String),
}

/// Accumulates matchers and a response, then mounts them on the server.
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    mock: wiremock::MockBuilder,
    status: u16,
    body: Option<StubBody>,
    delay: Option<Duration>,
    expected_calls: Option<u64>,
}

impl StubBuilder<'_> {
    /// Require a query parameter.
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.mock = self.mock.and(query_param(name, value));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.body = Some(StubBody::Json(body));
        self
    }

    pub fn respond_with_body(mut self, body: &str) -> Self {
        self.body = Some(StubBody::Text(body.to_string()));
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the test on drop unless the stub was hit exactly `times`.
    pub fn expect_times(mut self, times: u64) -> Self {
        self.expected_calls = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut response = ResponseTemplate::new(self.status);
        response = match self.body {
            Some(StubBody::Json(body)) => response.set_body_json(body),
            Some(StubBody::Text(body)) => response.set_body_string(body),
            None => response,
        };
        if let Some(delay) = self.delay {
            response = response.set_delay(delay);
        }

        let mut mock = self.mock.respond_with(response);
        if let Some(times) = self.expected_calls {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
