//! Typed description of one upstream call.

use crate::cache::ResourceClass;

/// Which bill sub-resource to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillEndpoint {
    Titles,
    Summaries,
}

impl BillEndpoint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Titles => "titles",
            Self::Summaries => "summaries",
        }
    }

    /// Parse the `endpoint` query value accepted by the bill route.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "titles" => Some(Self::Titles),
            "summaries" => Some(Self::Summaries),
            _ => None,
        }
    }
}

/// One upstream request, carrying everything needed to build its URL and its
/// cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamRequest {
    VoteList {
        congress: u32,
        session: u32,
        limit: u32,
    },
    Bill {
        bill_type: String,
        number: String,
        endpoint: BillEndpoint,
    },
    VoteDetail {
        roll: u32,
    },
    VoteMembers {
        roll: u32,
    },
    RepLookup {
        zip: String,
    },
}

impl UpstreamRequest {
    /// Bill request with the type normalised to lowercase, as upstream expects.
    pub fn bill(bill_type: &str, number: impl Into<String>, endpoint: BillEndpoint) -> Self {
        Self::Bill {
            bill_type: bill_type.to_lowercase(),
            number: number.into(),
            endpoint,
        }
    }

    #[must_use]
    pub const fn resource_class(&self) -> ResourceClass {
        match self {
            Self::VoteList { .. } => ResourceClass::VoteList,
            Self::Bill {
                endpoint: BillEndpoint::Titles,
                ..
            } => ResourceClass::BillTitle,
            Self::Bill {
                endpoint: BillEndpoint::Summaries,
                ..
            } => ResourceClass::BillSummary,
            Self::VoteDetail { .. } => ResourceClass::VoteDetail,
            Self::VoteMembers { .. } => ResourceClass::VoteMembers,
            Self::RepLookup { .. } => ResourceClass::RepLookup,
        }
    }

    /// Deterministic cache key built from the resource class and parameters.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::VoteList {
                congress,
                session,
                limit,
            } => format!("vote_list_{congress}_{session}_{limit}"),
            Self::Bill {
                bill_type,
                number,
                endpoint,
            } => format!("bill_{bill_type}_{number}_{}", endpoint.as_str()),
            Self::VoteDetail { roll } => format!("vote_detail_{roll}"),
            Self::VoteMembers { roll } => format!("vote_members_{roll}"),
            Self::RepLookup { zip } => format!("rep_zip_{zip}"),
        }
    }
}
