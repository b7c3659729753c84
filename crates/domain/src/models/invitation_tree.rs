//! Invitation forest models.
//!
//! These are derived views built per query from invitation edges and
//! identities. They are never persisted.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::identity::IdentitySummary;

/// One identity in the invitation forest together with everyone it invited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationNode {
    pub identity: IdentitySummary,
    pub children: Vec<InvitationNode>,
    /// Number of identities anywhere below this node.
    pub total_descendants: usize,
    /// Length of the longest downward path; 0 for a leaf.
    pub max_depth: usize,
    /// Set in filtered views when this node itself matched the query.
    /// Ancestors kept only for context have `matched == false`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub matched: bool,
}

impl InvitationNode {
    /// Size of the tree rooted here, including this node.
    pub fn tree_size(&self) -> usize {
        1 + self.total_descendants
    }
}

/// Query for the invitation forest endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InvitationTreeQuery {
    #[validate(custom(function = "shared::validation::validate_search_query"))]
    pub search: Option<String>,
}

/// Query for the forest summary endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ForestSummaryQuery {
    /// How many inviters to rank (1-100, default 10).
    #[validate(range(min = 1, max = 100, message = "top must be between 1 and 100"))]
    pub top: Option<usize>,
}

/// An inviter ranked by reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviterRanking {
    pub identity: IdentitySummary,
    pub direct_invitees: usize,
    pub total_descendants: usize,
}

/// Aggregate statistics over a whole forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForestSummary {
    pub total_identities: usize,
    pub root_count: usize,
    pub invited_count: usize,
    pub largest_tree_size: usize,
    pub deepest_chain: usize,
    pub top_inviters: Vec<InviterRanking>,
}
