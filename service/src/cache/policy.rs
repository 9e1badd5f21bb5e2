//! Resource classes and their fixed freshness policies.

use std::fmt;
use std::time::Duration;

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;
/// Six 30-day months.
const SIX_MONTHS: u64 = 6 * 30 * DAY;

/// Kind of upstream resource a cache entry holds.
///
/// The TTL of an entry depends only on its class, never on the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    VoteList,
    BillTitle,
    BillSummary,
    VoteDetail,
    VoteMembers,
    RepLookup,
}

impl ResourceClass {
    /// Time-to-live applied to entries of this class.
    #[must_use]
    pub const fn ttl(self) -> Duration {
        match self {
            Self::VoteList => Duration::from_secs(6 * HOUR),
            Self::BillTitle | Self::BillSummary | Self::VoteDetail | Self::VoteMembers => {
                Duration::from_secs(SIX_MONTHS)
            }
            Self::RepLookup => Duration::from_secs(DAY),
        }
    }

    /// Stable lowercase name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VoteList => "vote-list",
            Self::BillTitle => "bill-title",
            Self::BillSummary => "bill-summary",
            Self::VoteDetail => "vote-detail",
            Self::VoteMembers => "vote-members",
            Self::RepLookup => "rep-lookup",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
