//! Route handlers.
//!
//! Pass-through routes return the upstream JSON verbatim. Upstream failures
//! map to a 500 with a fixed message per route; the cause is logged, never
//! returned.

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, AppState};
use crate::reps::{self, Representative, VoteCard};
use crate::upstream::{BillEndpoint, UpstreamError, UpstreamRequest};

const ZIP_REQUIRED: &str = "5-digit ZIP required";

fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    extracted
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn upstream_failure(message: &'static str) -> impl FnOnce(UpstreamError) -> ApiError {
    move |e| {
        tracing::error!("{message}: {e}");
        ApiError::internal(message)
    }
}

async fn pass_through(
    state: &AppState,
    request: &UpstreamRequest,
    message: &'static str,
) -> Result<Json<Value>, ApiError> {
    state
        .upstream
        .fetch_or_cache(request)
        .await
        .map(Json)
        .map_err(upstream_failure(message))
}

#[derive(Debug, Deserialize)]
pub struct VoteListQuery {
    pub congress: Option<u32>,
    pub session: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/votes`
pub async fn vote_list(
    Extension(state): Extension<AppState>,
    params: Result<Query<VoteListQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query(params)?;
    let request = UpstreamRequest::VoteList {
        congress: params.congress.unwrap_or(state.defaults.congress),
        session: params.session.unwrap_or(state.defaults.session),
        limit: params.limit.unwrap_or(state.defaults.limit),
    };
    pass_through(&state, &request, "Congress API error").await
}

#[derive(Debug, Deserialize)]
pub struct BillQuery {
    #[serde(rename = "type")]
    pub bill_type: String,
    pub number: String,
    pub endpoint: String,
}

/// `GET /api/bill`
pub async fn bill(
    Extension(state): Extension<AppState>,
    params: Result<Query<BillQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query(params)?;
    let endpoint = BillEndpoint::parse(&params.endpoint)
        .ok_or_else(|| ApiError::bad_request("endpoint must be 'titles' or 'summaries'"))?;
    if params.bill_type.is_empty() || !params.bill_type.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::bad_request("type must be a bill type such as 'hr'"));
    }
    if params.number.is_empty() || !params.number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::bad_request("number must be numeric"));
    }

    let request = UpstreamRequest::bill(&params.bill_type, params.number, endpoint);
    pass_through(&state, &request, "Bill fetch failed").await
}

#[derive(Debug, Deserialize)]
pub struct RollQuery {
    pub roll: u32,
}

/// `GET /api/vote-detail`
pub async fn vote_detail(
    Extension(state): Extension<AppState>,
    params: Result<Query<RollQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let RollQuery { roll } = query(params)?;
    pass_through(&state, &UpstreamRequest::VoteDetail { roll }, "Detail fetch failed").await
}

/// `GET /api/vote-members`
pub async fn vote_members(
    Extension(state): Extension<AppState>,
    params: Result<Query<RollQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let RollQuery { roll } = query(params)?;
    pass_through(&state, &UpstreamRequest::VoteMembers { roll }, "Member fetch failed").await
}

#[derive(Debug, Deserialize)]
pub struct ZipQuery {
    pub zip: Option<String>,
}

/// `GET /api/my-rep`
pub async fn my_rep(
    Extension(state): Extension<AppState>,
    params: Result<Query<ZipQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let zip = query(params)?
        .zip
        .filter(|zip| reps::is_valid_zip(zip))
        .ok_or_else(|| ApiError::bad_request(ZIP_REQUIRED))?;

    pass_through(&state, &UpstreamRequest::RepLookup { zip }, "Upstream failed").await
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /api/admin/clear-cache`
pub async fn clear_cache(Extension(state): Extension<AppState>) -> Json<MessageResponse> {
    let removed = state.upstream.store().flush_all().await;
    tracing::warn!(removed, "cache flushed through unauthenticated admin endpoint");

    Json(MessageResponse {
        message: "Cache cleared".to_string(),
    })
}

/// The feed always covers the configured congress and session, so those
/// parameters are rejected rather than ignored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedQuery {
    pub limit: Option<u32>,
    pub zip: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub votes: Vec<VoteCard>,
    pub representative: Option<Representative>,
}

/// `GET /api/votes/aggregated`
///
/// With a `zip`, cards are filtered to the votes the resolved representative
/// took part in. An unresolvable ZIP leaves the feed unfiltered.
pub async fn aggregated_feed(
    Extension(state): Extension<AppState>,
    params: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<FeedResponse>, ApiError> {
    let params = query(params)?;
    if let Some(zip) = &params.zip {
        if !reps::is_valid_zip(zip) {
            return Err(ApiError::bad_request(ZIP_REQUIRED));
        }
    }

    let views = state
        .aggregator
        .vote_feed(params.limit.unwrap_or(state.defaults.limit))
        .await
        .map_err(upstream_failure("Vote feed failed"))?;

    let mut votes: Vec<VoteCard> = views.into_iter().map(VoteCard::new).collect();
    let representative = match &params.zip {
        Some(zip) => reps::resolve(&state.upstream, zip).await,
        None => None,
    };
    reps::filter(&mut votes, representative.as_ref());

    Ok(Json(FeedResponse {
        votes,
        representative,
    }))
}
