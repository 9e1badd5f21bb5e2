//! HTTP surface: JSON routes over the cache-through accessor and the
//! aggregated vote feed.
//!
//! [`router`] builds the complete application so `main.rs` and integration
//! tests wire it identically.

mod handlers;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::cache::CachedUpstream;
use crate::config::{Config, CorsConfig, RateLimitConfig};
use crate::votes::Aggregator;

/// Configured congress and session, plus the limit applied when a request
/// omits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedDefaults {
    pub congress: u32,
    pub session: u32,
    pub limit: u32,
}

impl FeedDefaults {
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            congress: config.upstream.congress,
            session: config.upstream.session,
            limit: config.upstream.vote_limit,
        }
    }
}

/// Shared handler state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub upstream: CachedUpstream,
    pub aggregator: Aggregator,
    pub defaults: FeedDefaults,
}

impl AppState {
    #[must_use]
    pub fn new(upstream: CachedUpstream, defaults: FeedDefaults) -> Self {
        Self {
            aggregator: Aggregator::new(upstream.clone(), defaults.congress, defaults.session),
            upstream,
            defaults,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failed request: status plus the fixed message returned to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Health check handler
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Build the CORS layer from configured origins.
#[must_use]
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = &config.allowed_origins;
    let allow_origin: AllowOrigin = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin");
        AllowOrigin::any()
    } else if origins.is_empty() {
        tracing::info!(
            "CORS allowed origins not configured - cross-origin requests will be blocked"
        );
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        tracing::info!(origins = ?origins, "CORS allowed origins configured");
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(allow_origin)
}

/// Build the application router.
///
/// When `static_dir` is set, unmatched paths are served from that directory.
/// The rate limiter keys on the peer address, so the router must be served
/// with `ConnectInfo<SocketAddr>`.
pub fn router(
    state: AppState,
    cors: &CorsConfig,
    rate_limit: &RateLimitConfig,
    static_dir: Option<&str>,
) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/api/votes", get(handlers::vote_list))
        .route("/api/votes/aggregated", get(handlers::aggregated_feed))
        .route("/api/bill", get(handlers::bill))
        .route("/api/vote-detail", get(handlers::vote_detail))
        .route("/api/vote-members", get(handlers::vote_members))
        .route("/api/my-rep", get(handlers::my_rep))
        .route("/api/admin/clear-cache", post(handlers::clear_cache));

    if let Some(dir) = static_dir {
        tracing::info!(%dir, "serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    if rate_limit.enabled {
        let interval_ms =
            u64::try_from(rate_limit.replenish_interval().as_millis()).unwrap_or(u64::MAX);
        match GovernorConfigBuilder::default()
            .per_millisecond(interval_ms)
            .burst_size(rate_limit.max_requests)
            .finish()
        {
            Some(governor) => {
                tracing::info!(
                    window_secs = rate_limit.window_secs,
                    max_requests = rate_limit.max_requests,
                    "per-IP rate limiting enabled"
                );
                app = app.layer(GovernorLayer::new(governor));
            }
            None => tracing::error!("invalid rate limit settings, requests are not limited"),
        }
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors))
            .layer(Extension(state)),
    )
}
