//! House roll-call votes: payload types, aggregation, and impact.
//!
//! [`Aggregator`] turns a [`Vote`] into an [`AggregatedVoteView`] by joining
//! bill metadata, vote detail, and member votes fetched through
//! [`crate::cache::CachedUpstream`].

mod aggregate;
mod impact;
mod types;

pub use aggregate::{Aggregator, PROCEDURAL_SUMMARY, PROCEDURAL_TITLE, SUMMARY_UNAVAILABLE};
pub use impact::classify;
pub use types::{
    AggregatedVoteView, ImpactLevel, MemberVote, PartyBreakdown, Vote, VoteListPayload,
};
