//! Filtering vote cards by a representative's participation.

use serde::Serialize;

use super::lookup::Representative;
use crate::votes::AggregatedVoteView;

/// Presentation state for one aggregated vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCard {
    #[serde(flatten)]
    pub view: AggregatedVoteView,
    pub visible: bool,
    /// Shown because it matched an active representative filter.
    pub filtered: bool,
    /// Indices into `view.member_votes` of the representative's votes.
    pub highlighted_members: Vec<usize>,
}

impl VoteCard {
    /// Visible, unfiltered, nothing highlighted.
    #[must_use]
    pub const fn new(view: AggregatedVoteView) -> Self {
        Self {
            view,
            visible: true,
            filtered: false,
            highlighted_members: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.visible = true;
        self.filtered = false;
        self.highlighted_members.clear();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.filtered = false;
        self.highlighted_members.clear();
    }

    fn apply(&mut self, last_name: &str) {
        if self.view.member_votes.iter().any(|m| m.last_name.is_none()) {
            tracing::warn!(
                roll = self.view.roll_call_number,
                "member vote without a last name, hiding card"
            );
            self.hide();
            return;
        }

        let highlighted: Vec<usize> = self
            .view
            .member_votes
            .iter()
            .enumerate()
            .filter(|(_, m)| m.last_name.as_deref().is_some_and(|l| normalize(l) == last_name))
            .map(|(index, _)| index)
            .collect();

        self.visible = !highlighted.is_empty();
        self.filtered = self.visible;
        self.highlighted_members = highlighted;
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Show only cards on which `rep` cast a vote, highlighting their entries.
/// `None` clears any previous filter.
pub fn filter(cards: &mut [VoteCard], rep: Option<&Representative>) {
    let Some(rep) = rep else {
        cards.iter_mut().for_each(VoteCard::reset);
        return;
    };

    let last_name = normalize(&rep.last_name);
    for card in cards {
        card.apply(&last_name);
    }
}
