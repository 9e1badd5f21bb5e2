//! Canned upstream payloads shaped like congress.gov and the ZIP lookup.

use serde_json::{json, Value};

/// Vote list with one bill vote (roll 43, HR 100) and one procedural vote
/// (roll 42).
pub fn vote_list() -> Value {
    json!({
        "houseRollCallVotes": [
            {
                "congress": 119,
                "sessionNumber": 2,
                "rollCallNumber": 43,
                "legislationType": "HR",
                "legislationNumber": "100",
                "result": "Passed",
                "startDate": "2026-01-13T14:05:00-05:00"
            },
            {
                "congress": 119,
                "sessionNumber": 2,
                "rollCallNumber": 42,
                "result": "Agreed to",
                "startDate": "2026-01-12T18:54:00-05:00"
            }
        ]
    })
}

pub fn vote_detail() -> Value {
    json!({
        "houseRollCallVote": {
            "voteQuestion": "On Passage",
            "votePartyTotal": [
                {"party": {"type": "R", "name": "Republican"}, "yeaTotal": 2, "nayTotal": 0, "notVotingTotal": 0},
                {"party": {"type": "D", "name": "Democratic"}, "yeaTotal": 0, "nayTotal": 1, "notVotingTotal": 0}
            ]
        }
    })
}

/// Members for a vote; Pelosi only takes part when `with_pelosi` is set.
pub fn vote_members(with_pelosi: bool) -> Value {
    let mut results = vec![
        json!({"firstName": "Mike", "lastName": "Johnson", "voteParty": "R", "voteState": "LA", "voteCast": "Yea"}),
        json!({"firstName": "Steve", "lastName": "Scalise", "voteParty": "R", "voteState": "LA", "voteCast": "Yea"}),
    ];
    if with_pelosi {
        results.push(json!({"firstName": "Nancy", "lastName": "Pelosi", "voteParty": "D", "voteState": "CA", "voteCast": "Nay"}));
    }
    json!({"houseRollCallVoteMemberVotes": {"results": results}})
}

pub fn bill_titles() -> Value {
    json!({
        "titles": [
            {"title": "Lower Costs Act", "titleType": "Short Title(s) as Introduced"},
            {"title": "To lower costs for families.", "titleType": "Official Title as Introduced"},
            {"title": "An Act to lower costs.", "titleType": "Official"}
        ]
    })
}

pub fn bill_summaries() -> Value {
    json!({"summaries": [{"text": "<p>This bill <strong>lowers</strong> costs.</p>"}]})
}

pub fn rep_lookup() -> Value {
    json!({
        "results": [
            {"name": "Nancy Pelosi", "party": "Democrat", "state": "CA", "district": "11"}
        ]
    })
}
