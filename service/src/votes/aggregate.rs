//! Per-vote aggregation: bill metadata, party tallies, member votes, impact.

use std::sync::LazyLock;

use futures::future::try_join_all;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::impact::classify;
use super::types::{
    AggregatedVoteView, BillSummariesPayload, BillTitle, BillTitlesPayload, MemberVote,
    PartyBreakdown, PartyTotal, Vote, VoteDetailPayload, VoteListPayload, VoteMembersPayload,
};
use crate::cache::{CachedUpstream, ResourceClass};
use crate::upstream::{BillEndpoint, UpstreamError, UpstreamRequest};

pub const PROCEDURAL_TITLE: &str = "Procedural Vote";
pub const PROCEDURAL_SUMMARY: &str = "No summary available for procedural votes.";
pub const SUMMARY_UNAVAILABLE: &str = "Summary not yet available";

const UNKNOWN_PARTY: &str = "unknown";

#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"));

/// Bill metadata as fetched, before the title and summary are chosen.
enum BillText {
    Procedural,
    Unavailable {
        bill_type: String,
        number: String,
    },
    Fetched {
        bill_type: String,
        number: String,
        titles: BillTitlesPayload,
        summaries: BillSummariesPayload,
    },
}

/// Builds [`AggregatedVoteView`]s through the cache-through accessor.
///
/// Vote detail and member lookups are keyed by roll number alone and resolve
/// against the upstream client's configured congress and session, so the
/// feed is pinned to that same congress and session.
#[derive(Clone)]
pub struct Aggregator {
    upstream: CachedUpstream,
    congress: u32,
    session: u32,
}

impl Aggregator {
    #[must_use]
    pub const fn new(upstream: CachedUpstream, congress: u32, session: u32) -> Self {
        Self {
            upstream,
            congress,
            session,
        }
    }

    /// Aggregate one vote.
    ///
    /// Bill metadata, vote detail, and member votes are fetched concurrently
    /// and joined before the merge. Bill failures fall back to placeholder
    /// text; detail or member failures fail the aggregation.
    ///
    /// # Errors
    /// Returns the [`UpstreamError`] of the detail or members fetch, or a
    /// `Malformed` error when the detail payload carries no vote.
    pub async fn aggregate(&self, vote: &Vote) -> Result<AggregatedVoteView, UpstreamError> {
        let roll = vote.roll_call_number;
        let detail_request = UpstreamRequest::VoteDetail { roll };
        let members_request = UpstreamRequest::VoteMembers { roll };

        let (bill, detail, members) = tokio::join!(
            self.fetch_bill(vote),
            self.upstream.fetch_or_cache(&detail_request),
            self.upstream.fetch_or_cache(&members_request),
        );

        let detail = parse::<VoteDetailPayload>(detail?, ResourceClass::VoteDetail)?
            .vote
            .ok_or_else(|| {
                UpstreamError::malformed(ResourceClass::VoteDetail, "missing houseRollCallVote")
            })?;
        let member_votes =
            parse::<VoteMembersPayload>(members?, ResourceClass::VoteMembers)?.into_results();

        let question = vote.vote_question.clone().or(detail.vote_question);
        let (title, summary) = resolve_text(bill, question.as_deref());
        let party_breakdown = party_breakdown(roll, &detail.vote_party_total, &member_votes);
        let impact = classify(&member_votes);

        Ok(AggregatedVoteView {
            roll_call_number: roll,
            legislation_type: vote.legislation_type.clone(),
            legislation_number: vote.legislation_number.clone(),
            title,
            summary,
            question,
            result: vote.result.clone(),
            start_date: vote.start_date.clone(),
            impact,
            party_breakdown,
            member_votes,
        })
    }

    /// Aggregate every vote concurrently, preserving input order.
    ///
    /// # Errors
    /// Fails with the first aggregation error; no partial feed is returned.
    pub async fn aggregate_all(
        &self,
        votes: &[Vote],
    ) -> Result<Vec<AggregatedVoteView>, UpstreamError> {
        try_join_all(votes.iter().map(|vote| self.aggregate(vote))).await
    }

    /// Fetch the latest `limit` votes of the configured congress and session
    /// and aggregate each entry.
    ///
    /// # Errors
    /// Returns an error if the list fetch fails, the list is malformed, or
    /// any aggregation fails.
    pub async fn vote_feed(&self, limit: u32) -> Result<Vec<AggregatedVoteView>, UpstreamError> {
        let request = UpstreamRequest::VoteList {
            congress: self.congress,
            session: self.session,
            limit,
        };
        let list: VoteListPayload = parse(
            self.upstream.fetch_or_cache(&request).await?,
            ResourceClass::VoteList,
        )?;
        tracing::debug!(count = list.votes.len(), "aggregating vote feed");

        self.aggregate_all(&list.votes).await
    }

    async fn fetch_bill(&self, vote: &Vote) -> BillText {
        let Some((bill_type, number)) = vote.legislation() else {
            return BillText::Procedural;
        };

        let titles_request = UpstreamRequest::bill(bill_type, number, BillEndpoint::Titles);
        let summaries_request = UpstreamRequest::bill(bill_type, number, BillEndpoint::Summaries);
        let (titles, summaries) = tokio::join!(
            self.upstream.fetch_or_cache(&titles_request),
            self.upstream.fetch_or_cache(&summaries_request),
        );

        let titles = titles.and_then(|v| parse::<BillTitlesPayload>(v, ResourceClass::BillTitle));
        let summaries =
            summaries.and_then(|v| parse::<BillSummariesPayload>(v, ResourceClass::BillSummary));

        let bill_type = bill_type.to_string();
        let number = number.to_string();
        match (titles, summaries) {
            (Ok(titles), Ok(summaries)) => BillText::Fetched {
                bill_type,
                number,
                titles,
                summaries,
            },
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(roll = vote.roll_call_number, "bill metadata unavailable: {e}");
                BillText::Unavailable { bill_type, number }
            }
        }
    }
}

fn parse<T: DeserializeOwned>(value: Value, class: ResourceClass) -> Result<T, UpstreamError> {
    serde_json::from_value(value).map_err(|e| UpstreamError::malformed(class, e.to_string()))
}

fn resolve_text(bill: BillText, question: Option<&str>) -> (String, String) {
    match bill {
        BillText::Procedural => (PROCEDURAL_TITLE.to_string(), PROCEDURAL_SUMMARY.to_string()),
        BillText::Unavailable { bill_type, number } => {
            (format!("{bill_type} {number}"), SUMMARY_UNAVAILABLE.to_string())
        }
        BillText::Fetched {
            bill_type,
            number,
            titles,
            summaries,
        } => {
            let title = pick_title(&titles.titles)
                .or(question)
                .map_or_else(|| format!("{bill_type} {number}"), str::to_string);
            let summary = summaries
                .summaries
                .first()
                .and_then(|s| s.text.as_deref())
                .map(strip_tags)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string());
            (title, summary)
        }
    }
}

/// The official title if there is one, otherwise the first title.
fn pick_title(titles: &[BillTitle]) -> Option<&str> {
    titles
        .iter()
        .find(|t| t.title_type.as_deref() == Some("Official") && t.title.is_some())
        .or_else(|| titles.first())
        .and_then(|t| t.title.as_deref())
}

fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").trim().to_string()
}

fn party_breakdown(roll: u32, totals: &[PartyTotal], members: &[MemberVote]) -> Vec<PartyBreakdown> {
    totals
        .iter()
        .map(|total| {
            let party_type = total
                .party
                .as_ref()
                .and_then(|p| p.party_type.clone())
                .filter(|t| !t.is_empty());
            if party_type.is_none() {
                tracing::warn!(roll, "party total without a party type");
            }

            let party_name = total
                .party
                .as_ref()
                .and_then(|p| p.name.clone())
                .or_else(|| party_type.clone())
                .unwrap_or_else(|| UNKNOWN_PARTY.to_string());
            let party_class = party_type
                .as_deref()
                .map_or_else(|| UNKNOWN_PARTY.to_string(), str::to_lowercase);
            let members = members
                .iter()
                .filter(|m| m.party.as_deref() == party_type.as_deref())
                .cloned()
                .collect();

            PartyBreakdown {
                party_type,
                party_class,
                party_name,
                yea_total: total.yea_total.unwrap_or(0),
                nay_total: total.nay_total.unwrap_or(0),
                not_voting_total: total.not_voting_total.unwrap_or(0),
                members,
            }
        })
        .collect()
}
