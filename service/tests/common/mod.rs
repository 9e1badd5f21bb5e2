//! Common test utilities for integration tests.
//!
//! This module provides:
//!
//! - [`app_builder::TestAppBuilder`] - Build test Axum apps that mirror main.rs wiring
//! - [`http_mock::MockHttpServer`] - Stub the congress.gov and ZIP lookup services
//! - [`fixtures`] - Canned upstream payloads
//!
//! # App Builder Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_app() {
//!     let app = TestAppBuilder::new().build();
//!     app.upstream.respond(&request, payload);
//!     // Use app.router.oneshot(...) to send requests
//! }
//! ```

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod app_builder;
pub mod fixtures;
pub mod http_mock;
