//! Impact classification of a roll call.

use super::types::{ImpactLevel, MemberVote};

/// Turnout a vote must exceed (yea + nay) to be considered high impact.
const HIGH_IMPACT_MIN_TOTAL: usize = 200;
/// A high-impact vote is decided by fewer than this many votes.
const HIGH_IMPACT_MAX_MARGIN: usize = 20;

/// Classify a vote from its member votes.
///
/// Only `Yea` and `Nay` count. A vote is [`ImpactLevel::High`] when more than
/// 200 members voted yea or nay and the margin between them is under 20.
#[must_use]
pub fn classify(member_votes: &[MemberVote]) -> ImpactLevel {
    let (yea, nay) = member_votes
        .iter()
        .fold((0usize, 0usize), |(yea, nay), m| match m.vote_cast.as_str() {
            "Yea" => (yea + 1, nay),
            "Nay" => (yea, nay + 1),
            _ => (yea, nay),
        });

    let total = yea + nay;
    let margin = yea.abs_diff(nay);

    if total > HIGH_IMPACT_MIN_TOTAL && margin < HIGH_IMPACT_MAX_MARGIN {
        ImpactLevel::High
    } else {
        ImpactLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn votes(yea: usize, nay: usize, other: usize) -> Vec<MemberVote> {
        let cast = |c: &str| MemberVote {
            first_name: "A".into(),
            last_name: Some("B".into()),
            party: Some("D".into()),
            state: None,
            vote_cast: c.into(),
        };
        std::iter::repeat_with(|| cast("Yea"))
            .take(yea)
            .chain(std::iter::repeat_with(|| cast("Nay")).take(nay))
            .chain(std::iter::repeat_with(|| cast("Not Voting")).take(other))
            .collect()
    }

    #[test]
    fn classify_known_tallies() {
        let cases = [
            (150, 40, ImpactLevel::Low, "wide margin"),
            (140, 130, ImpactLevel::High, "large and close"),
            (5, 3, ImpactLevel::Low, "low turnout"),
            (101, 100, ImpactLevel::High, "total 201 margin 1"),
            (100, 100, ImpactLevel::Low, "total exactly 200"),
            (120, 100, ImpactLevel::Low, "margin exactly 20"),
            (119, 100, ImpactLevel::High, "margin 19"),
            (0, 0, ImpactLevel::Low, "no votes"),
        ];

        for (yea, nay, expected, desc) in cases {
            assert_eq!(classify(&votes(yea, nay, 0)), expected, "case '{desc}'");
        }
    }

    #[test]
    fn present_and_not_voting_are_ignored() {
        let mut members = votes(140, 130, 50);
        members.push(MemberVote {
            first_name: "P".into(),
            last_name: Some("Q".into()),
            party: None,
            state: None,
            vote_cast: "Present".into(),
        });
        assert_eq!(classify(&members), ImpactLevel::High);
    }

    proptest! {
        #[test]
        fn classification_matches_rule(yea in 0usize..300, nay in 0usize..300, other in 0usize..20) {
            let expected = if yea + nay > 200 && yea.abs_diff(nay) < 20 {
                ImpactLevel::High
            } else {
                ImpactLevel::Low
            };
            prop_assert_eq!(classify(&votes(yea, nay, other)), expected);
        }

        #[test]
        fn order_does_not_matter(yea in 0usize..250, nay in 0usize..250) {
            let mut members = votes(yea, nay, 3);
            let forward = classify(&members);
            members.reverse();
            prop_assert_eq!(classify(&members), forward);
        }
    }
}
