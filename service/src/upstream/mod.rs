//! Upstream data sources: the congress.gov House vote API and the
//! ZIP-to-representative lookup.
//!
//! # Architecture
//!
//! - [`UpstreamRequest`] - one call, with its cache key and resource class
//! - [`UpstreamFetcher`] - trait performing a request
//! - [`HttpUpstreamClient`] - real HTTP implementation using reqwest
//! - [`mock::MockUpstream`] - canned responses for tests (behind `test-utils`)
//!
//! Fetchers never retry and never cache; caching lives in
//! [`crate::cache::CachedUpstream`].

mod client;
mod request;

pub use client::{HttpUpstreamClient, UpstreamError, UpstreamFetcher, UpstreamSettings};
pub use request::{BillEndpoint, UpstreamRequest};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
