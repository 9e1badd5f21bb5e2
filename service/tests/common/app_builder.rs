//! Test app builder that mirrors main.rs wiring with an injectable upstream.
//!
//! [`TestAppBuilder`] constructs the same router `main.rs` serves, but backed
//! by a [`MockUpstream`] so tests control every upstream payload and can
//! count calls.
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_full_app() {
//!     let app = TestAppBuilder::new()
//!         .with_cors(&["http://localhost:3000"])
//!         .build();
//!
//!     // Use app.router.oneshot(...) to send requests
//! }
//! ```

use std::sync::Arc;

use axum::Router;
use rollcall_api::{
    cache::{CacheStore, CachedUpstream},
    config::{CorsConfig, RateLimitConfig},
    http::{router, AppState, FeedDefaults},
    upstream::{mock::MockUpstream, UpstreamFetcher},
};

/// A built app plus handles to its mock upstream and cache.
pub struct TestApp {
    pub router: Router,
    pub upstream: Arc<MockUpstream>,
    pub store: Arc<CacheStore>,
}

/// Builder for test applications that mirrors main.rs wiring.
pub struct TestAppBuilder {
    /// Mock upstream shared with the caller
    upstream: Arc<MockUpstream>,
    /// CORS allowed origins (empty blocks cross-origin requests)
    cors_origins: Vec<String>,
    /// Directory served as the router fallback
    static_dir: Option<String>,
    defaults: FeedDefaults,
    /// Disabled unless a test opts in
    rate_limit: RateLimitConfig,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Builder with congress 119, session 2, limit 100, no CORS origins and
    /// no rate limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            upstream: Arc::new(MockUpstream::new()),
            cors_origins: Vec::new(),
            static_dir: None,
            defaults: FeedDefaults {
                congress: 119,
                session: 2,
                limit: 100,
            },
            rate_limit: RateLimitConfig {
                enabled: false,
                ..RateLimitConfig::default()
            },
        }
    }

    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.cors_origins = origins.iter().map(|s| (*s).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_static_dir(mut self, dir: &str) -> Self {
        self.static_dir = Some(dir.to_string());
        self
    }

    #[must_use]
    pub const fn with_defaults(mut self, defaults: FeedDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Limit each client IP to `max_requests` per `window_secs`.
    #[must_use]
    pub const fn with_rate_limit(mut self, window_secs: u64, max_requests: u32) -> Self {
        self.rate_limit = RateLimitConfig {
            enabled: true,
            window_secs,
            max_requests,
        };
        self
    }

    /// Build the router with the same layers as production.
    #[must_use]
    pub fn build(self) -> TestApp {
        let store = Arc::new(CacheStore::new());
        let fetcher = Arc::clone(&self.upstream) as Arc<dyn UpstreamFetcher>;
        let state = AppState::new(CachedUpstream::new(Arc::clone(&store), fetcher), self.defaults);
        let cors = CorsConfig {
            allowed_origins: self.cors_origins,
        };

        TestApp {
            router: router(state, &cors, &self.rate_limit, self.static_dir.as_deref()),
            upstream: self.upstream,
            store,
        }
    }
}
