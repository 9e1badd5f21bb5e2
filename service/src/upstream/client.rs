//! Fetchers for the congress.gov vote API and the ZIP-to-representative
//! lookup.
//!
//! The [`UpstreamFetcher`] trait is the seam between the cache layer and the
//! network. [`HttpUpstreamClient`] talks to the real services; the `mock`
//! module (behind `test-utils`) records calls and replays canned payloads.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::request::UpstreamRequest;
use crate::cache::ResourceClass;

/// Failure of a single upstream call. Never cached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("{resource_class} upstream returned status {status}")]
    Status {
        resource_class: ResourceClass,
        status: u16,
    },

    /// Body was not the JSON shape we expect.
    #[error("{resource_class} upstream payload malformed: {reason}")]
    Malformed {
        resource_class: ResourceClass,
        reason: String,
    },

    /// No response within the configured bound.
    #[error("{resource_class} upstream timed out")]
    Timeout { resource_class: ResourceClass },

    /// Connection-level failure.
    #[error("{resource_class} upstream request failed: {reason}")]
    Transport {
        resource_class: ResourceClass,
        reason: String,
    },
}

impl UpstreamError {
    #[must_use]
    pub const fn resource_class(&self) -> ResourceClass {
        match self {
            Self::Status { resource_class, .. }
            | Self::Malformed { resource_class, .. }
            | Self::Timeout { resource_class }
            | Self::Transport { resource_class, .. } => *resource_class,
        }
    }

    /// Build a `Malformed` error for `resource_class`.
    pub fn malformed(resource_class: ResourceClass, reason: impl Into<String>) -> Self {
        Self::Malformed {
            resource_class,
            reason: reason.into(),
        }
    }

    fn from_reqwest(resource_class: ResourceClass, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { resource_class }
        } else if err.is_decode() {
            Self::malformed(resource_class, err.to_string())
        } else {
            Self::Transport {
                resource_class,
                reason: err.to_string(),
            }
        }
    }
}

/// Performs one upstream request and returns its JSON body.
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    /// Fetch the resource described by `request`. No retries.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError>;
}

/// Connection settings for [`HttpUpstreamClient`].
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// congress.gov v3 base URL, e.g. `https://api.congress.gov/v3`.
    pub congress_base_url: String,
    pub api_key: String,
    /// Base URL of the ZIP lookup service.
    pub rep_lookup_base_url: String,
    /// Congress number used for bill, detail, and member lookups.
    pub congress: u32,
    /// Session used for detail and member lookups.
    pub session: u32,
    /// Upper bound on one request, connect through body.
    pub timeout: Duration,
}

/// HTTP-based implementation of [`UpstreamFetcher`].
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    settings: UpstreamSettings,
}

impl HttpUpstreamClient {
    /// Create a client whose requests are bounded by `settings.timeout`.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(settings: UpstreamSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    fn build_request(&self, request: &UpstreamRequest) -> reqwest::RequestBuilder {
        let s = &self.settings;
        let base = s.congress_base_url.trim_end_matches('/');

        match request {
            UpstreamRequest::VoteList {
                congress,
                session,
                limit,
            } => self
                .client
                .get(format!("{base}/house-vote/{congress}/{session}"))
                .query(&[("api_key", s.api_key.as_str()), ("sort", "startedDate desc")])
                .query(&[("limit", limit)]),
            UpstreamRequest::Bill {
                bill_type,
                number,
                endpoint,
            } => self
                .client
                .get(format!(
                    "{base}/bill/{}/{bill_type}/{number}/{}",
                    s.congress,
                    endpoint.as_str()
                ))
                .query(&[("api_key", s.api_key.as_str()), ("format", "json")]),
            UpstreamRequest::VoteDetail { roll } => self
                .client
                .get(format!("{base}/house-vote/{}/{}/{roll}", s.congress, s.session))
                .query(&[("api_key", s.api_key.as_str())]),
            UpstreamRequest::VoteMembers { roll } => self
                .client
                .get(format!(
                    "{base}/house-vote/{}/{}/{roll}/members",
                    s.congress, s.session
                ))
                .query(&[("api_key", s.api_key.as_str())]),
            UpstreamRequest::RepLookup { zip } => self
                .client
                .get(format!(
                    "{}/getall_mems.php",
                    s.rep_lookup_base_url.trim_end_matches('/')
                ))
                .query(&[("zip", zip.as_str()), ("output", "json")]),
        }
    }
}

#[async_trait]
impl UpstreamFetcher for HttpUpstreamClient {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let resource_class = request.resource_class();

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(resource_class, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%resource_class, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Status {
                resource_class,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(resource_class, &e))?;

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::malformed(resource_class, e.to_string()))?;

        if !value.is_object() {
            return Err(UpstreamError::malformed(
                resource_class,
                "expected a JSON object",
            ));
        }

        Ok(value)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock fetcher for unit and integration tests.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::{async_trait, UpstreamError, UpstreamFetcher, UpstreamRequest, Value};

    /// Replays canned payloads keyed by request cache key and records every
    /// call. Requests with no configured response fail with status 404.
    #[derive(Default)]
    pub struct MockUpstream {
        responses: Mutex<HashMap<String, Result<Value, UpstreamError>>>,
        calls: Mutex<Vec<UpstreamRequest>>,
        delay: Mutex<Option<Duration>>,
    }

    impl MockUpstream {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `request` with `payload` on every call.
        pub fn respond(&self, request: &UpstreamRequest, payload: Value) {
            self.responses
                .lock()
                .expect("lock poisoned")
                .insert(request.cache_key(), Ok(payload));
        }

        /// Fail `request` with `error` on every call.
        pub fn fail(&self, request: &UpstreamRequest, error: UpstreamError) {
            self.responses
                .lock()
                .expect("lock poisoned")
                .insert(request.cache_key(), Err(error));
        }

        /// Sleep this long inside every fetch before answering.
        pub fn set_delay(&self, delay: Duration) {
            *self.delay.lock().expect("lock poisoned") = Some(delay);
        }

        /// All requests seen so far, in call order.
        pub fn calls(&self) -> Vec<UpstreamRequest> {
            self.calls.lock().expect("lock poisoned").clone()
        }

        /// How many times `request` reached the mock.
        pub fn call_count(&self, request: &UpstreamRequest) -> usize {
            self.calls
                .lock()
                .expect("lock poisoned")
                .iter()
                .filter(|seen| *seen == request)
                .count()
        }
    }

    #[async_trait]
    impl UpstreamFetcher for MockUpstream {
        async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
            self.calls
                .lock()
                .expect("lock poisoned")
                .push(request.clone());

            let delay = *self.delay.lock().expect("lock poisoned");
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.responses
                .lock()
                .expect("lock poisoned")
                .get(&request.cache_key())
                .cloned()
                .unwrap_or_else(|| {
                    Err(UpstreamError::Status {
                        resource_class: request.resource_class(),
                        status: 404,
                    })
                })
        }
    }
}
