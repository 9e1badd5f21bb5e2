//! ZIP code to House representative.

use serde::{Deserialize, Serialize};

use crate::cache::CachedUpstream;
use crate::upstream::UpstreamRequest;

/// Whether `zip` is exactly five ASCII digits.
#[must_use]
pub fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

/// The representative for a ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub last_name: String,
    pub first_name: String,
    pub state: Option<String>,
    pub district: Option<String>,
}

impl Representative {
    /// Split a display name: the last whitespace-separated token is the last
    /// name, everything before it the first name.
    ///
    /// Returns `None` for a blank name.
    #[must_use]
    pub fn from_raw_name(name: &str, state: Option<String>, district: Option<String>) -> Option<Self> {
        let mut tokens: Vec<&str> = name.split_whitespace().collect();
        let last_name = tokens.pop()?.to_string();

        Some(Self {
            last_name,
            first_name: tokens.join(" "),
            state,
            district,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LookupPayload {
    #[serde(default)]
    results: Vec<LookupEntry>,
}

#[derive(Debug, Deserialize)]
struct LookupEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    district: Option<String>,
}

/// Resolve the representative for `zip` through the cache.
///
/// Upstream failures, unparseable payloads and empty results all resolve to
/// `None`.
pub async fn resolve(upstream: &CachedUpstream, zip: &str) -> Option<Representative> {
    let request = UpstreamRequest::RepLookup {
        zip: zip.to_string(),
    };

    let value = match upstream.fetch_or_cache(&request).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(%zip, "representative lookup failed: {e}");
            return None;
        }
    };

    let payload: LookupPayload = match serde_json::from_value(value) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(%zip, "representative lookup payload unreadable: {e}");
            return None;
        }
    };

    let entry = payload.results.into_iter().next()?;
    Representative::from_raw_name(&entry.name, entry.state, entry.district)
}
