//! Vote data: the upstream payload shapes we read and the aggregated view we
//! produce.
//!
//! Upstream payloads are parsed leniently: every field we do not strictly
//! need is optional, so schema drift degrades to fallbacks instead of errors.

use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::{deserialize_default_from_null, deserialize_number_from_string};

/// Accept a JSON string or an integer, producing a string.
fn deserialize_opt_string_from_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

// ─── Upstream: vote list ─────────────────────────────────────────────────────

/// Envelope of the vote-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteListPayload {
    #[serde(rename = "houseRollCallVotes", default, deserialize_with = "deserialize_default_from_null")]
    pub votes: Vec<Vote>,
}

/// One roll-call vote as listed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub roll_call_number: u32,
    #[serde(default)]
    pub legislation_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string_from_number")]
    pub legislation_number: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub vote_question: Option<String>,
}

impl Vote {
    /// Bill type and number when both are present and non-empty.
    ///
    /// Votes without them are procedural.
    #[must_use]
    pub fn legislation(&self) -> Option<(&str, &str)> {
        let bill_type = self.legislation_type.as_deref().filter(|s| !s.is_empty())?;
        let number = self.legislation_number.as_deref().filter(|s| !s.is_empty())?;
        Some((bill_type, number))
    }
}

// ─── Upstream: bill metadata ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillTitlesPayload {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub titles: Vec<BillTitle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTitle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillSummariesPayload {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub summaries: Vec<BillSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillSummary {
    #[serde(default)]
    pub text: Option<String>,
}

// ─── Upstream: vote detail ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct VoteDetailPayload {
    #[serde(rename = "houseRollCallVote", default)]
    pub vote: Option<VoteDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDetail {
    #[serde(default)]
    pub vote_question: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub vote_party_total: Vec<PartyTotal>,
}

/// Per-party tally in the vote detail payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyTotal {
    #[serde(default)]
    pub party: Option<PartyInfo>,
    #[serde(default)]
    pub yea_total: Option<u32>,
    #[serde(default)]
    pub nay_total: Option<u32>,
    #[serde(default)]
    pub not_voting_total: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyInfo {
    #[serde(rename = "type", default)]
    pub party_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// ─── Upstream: member votes ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct VoteMembersPayload {
    #[serde(rename = "houseRollCallVoteMemberVotes", default)]
    pub member_votes: Option<MemberVotesBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberVotesBlock {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub results: Vec<MemberVote>,
}

impl VoteMembersPayload {
    /// Member votes, empty when the block is missing.
    #[must_use]
    pub fn into_results(self) -> Vec<MemberVote> {
        self.member_votes.map(|block| block.results).unwrap_or_default()
    }
}

/// How one member voted on one roll call.
///
/// Upstream calls the party and state fields `voteParty` and `voteState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberVote {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, alias = "voteParty")]
    pub party: Option<String>,
    #[serde(default, alias = "voteState", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub vote_cast: String,
}

// ─── Aggregated view ─────────────────────────────────────────────────────────

/// Two-valued summary of how contested a vote was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Low,
}

/// Totals and members for one party on one vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBreakdown {
    /// Upstream party code ("R", "D", "I"); `None` when upstream omitted it.
    pub party_type: Option<String>,
    /// Lowercased party code, or `"unknown"`.
    pub party_class: String,
    pub party_name: String,
    pub yea_total: u32,
    pub nay_total: u32,
    pub not_voting_total: u32,
    pub members: Vec<MemberVote>,
}

/// One vote merged with its bill metadata, party tallies, member votes, and
/// impact classification. Derived per request; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedVoteView {
    pub roll_call_number: u32,
    pub legislation_type: Option<String>,
    pub legislation_number: Option<String>,
    pub title: String,
    pub summary: String,
    pub question: Option<String>,
    pub result: Option<String>,
    pub start_date: Option<String>,
    pub impact: ImpactLevel,
    pub party_breakdown: Vec<PartyBreakdown>,
    pub member_votes: Vec<MemberVote>,
}
