//! Invitation forest construction.
//!
//! Turns flat invitation edges into "who invited whom" trees. Each identity
//! appears exactly once; identities nobody invited are roots. Edges pointing
//! outside the identity set are skipped, and cycles left by corrupt data are
//! broken instead of looping.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use uuid::Uuid;

use shared::validation::{normalize_email, normalize_search_query};

use crate::errors::StoreError;
use crate::models::{ForestSummary, Identity, InvitationEdge, InvitationNode, InviterRanking};

use super::store::{IdentityStore, InvitationStore};

/// Inviters listed in a forest summary unless the caller asks otherwise.
pub const DEFAULT_TOP_INVITERS: usize = 10;

/// Levels per tree. A chain longer than this continues as a new root.
pub const MAX_FOREST_DEPTH: usize = 512;

/// Display order for roots and siblings.
fn display_order(a: &Identity, b: &Identity) -> Ordering {
    a.last_name
        .to_lowercase()
        .cmp(&b.last_name.to_lowercase())
        .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        .then_with(|| a.email.to_lowercase().cmp(&b.email.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Builds the invitation forest.
///
/// When an identity has several inbound edges its parent comes from the
/// accepted edge, else the earliest one, ties broken by edge id. A cycle is
/// rooted at its member that sorts first in display order. No tree is deeper
/// than [`MAX_FOREST_DEPTH`] levels.
pub fn build_forest(edges: &[InvitationEdge], identities: &[Identity]) -> Vec<InvitationNode> {
    let mut arena: Vec<&Identity> = identities.iter().collect();
    arena.sort_by(|a, b| display_order(a, b));
    let len = arena.len();

    let index_of: HashMap<Uuid, usize> = arena
        .iter()
        .enumerate()
        .map(|(idx, identity)| (identity.id, idx))
        .collect();

    // A real account wins over a placeholder sharing its address.
    let mut by_email: HashMap<String, usize> = HashMap::with_capacity(len);
    for (idx, identity) in arena.iter().enumerate() {
        let key = normalize_email(&identity.email);
        match by_email.get(&key) {
            Some(&existing) if !(arena[existing].is_unclaimed && !identity.is_unclaimed) => {}
            _ => {
                by_email.insert(key, idx);
            }
        }
    }

    let mut chosen: Vec<Option<&InvitationEdge>> = vec![None; len];
    let mut parent: Vec<Option<usize>> = vec![None; len];
    let mut skipped = 0usize;
    for edge in edges {
        let invitee = by_email.get(&normalize_email(&edge.invitee_email)).copied();
        let inviter = index_of.get(&edge.inviter_id).copied();
        let (Some(invitee), Some(inviter)) = (invitee, inviter) else {
            skipped += 1;
            continue;
        };
        if invitee == inviter {
            skipped += 1;
            continue;
        }

        let better = match chosen[invitee] {
            None => true,
            Some(current) => edge_rank(edge) < edge_rank(current),
        };
        if better {
            chosen[invitee] = Some(edge);
            parent[invitee] = Some(inviter);
        }
    }
    if skipped > 0 {
        debug!(skipped, "Skipped dangling or self-referencing invitation edges");
    }

    // Arena order keeps every child list sorted.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
    for (idx, p) in parent.iter().enumerate() {
        if let Some(p) = p {
            children[*p].push(idx);
        }
    }

    let mut walk = ForestWalk::new(len);
    let mut detached = 0usize;
    for idx in 0..len {
        if parent[idx].is_none() {
            detached += walk.run(idx, &children);
        }
    }

    let mut cycles = 0usize;
    for idx in 0..len {
        if walk.visited[idx] {
            continue;
        }
        cycles += 1;
        detached += walk.run(cycle_entry(idx, &parent), &children);
    }
    if cycles > 0 {
        warn!(cycles, "Invitation graph contains cycles; breaking them");
    }
    if detached > 0 {
        warn!(
            detached,
            max_depth = MAX_FOREST_DEPTH,
            "Invitation chains exceed the depth limit; continuing them as new roots"
        );
    }

    let ForestWalk {
        kept,
        preorder,
        mut roots,
        ..
    } = walk;

    let mut total = vec![0usize; len];
    let mut depth = vec![0usize; len];
    for &node in preorder.iter().rev() {
        for &child in &kept[node] {
            total[node] += 1 + total[child];
            depth[node] = depth[node].max(1 + depth[child]);
        }
    }

    let mut built: Vec<Option<InvitationNode>> = vec![None; len];
    for &node in preorder.iter().rev() {
        let subtree = kept[node]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[node] = Some(InvitationNode {
            identity: arena[node].summary(),
            children: subtree,
            total_descendants: total[node],
            max_depth: depth[node],
            matched: false,
        });
    }

    roots.sort_unstable();
    roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}

/// Iterative depth-first traversal state shared by every root of one forest.
struct ForestWalk {
    visited: Vec<bool>,
    kept: Vec<Vec<usize>>,
    preorder: Vec<usize>,
    roots: Vec<usize>,
}

impl ForestWalk {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            kept: vec![Vec::new(); len],
            preorder: Vec::with_capacity(len),
            roots: Vec::new(),
        }
    }

    /// Walks the tree under `root`. Children that would sit at
    /// `MAX_FOREST_DEPTH` start trees of their own; returns how many did.
    fn run(&mut self, root: usize, children: &[Vec<usize>]) -> usize {
        let mut detached = 0;
        let mut pending = vec![root];
        self.visited[root] = true;

        while let Some(start) = pending.pop() {
            self.roots.push(start);
            let mut stack = vec![(start, 0usize)];
            while let Some((node, level)) = stack.pop() {
                self.preorder.push(node);
                for &child in &children[node] {
                    if self.visited[child] {
                        continue;
                    }
                    self.visited[child] = true;
                    if level + 1 >= MAX_FOREST_DEPTH {
                        detached += 1;
                        pending.push(child);
                    } else {
                        self.kept[node].push(child);
                    }
                }
                stack.extend(self.kept[node].iter().rev().map(|&child| (child, level + 1)));
            }
        }
        detached
    }
}

/// Lower ranks are preferred as the parent edge.
fn edge_rank(edge: &InvitationEdge) -> (bool, chrono::DateTime<chrono::Utc>, Uuid) {
    (edge.used_at.is_none(), edge.created_at, edge.id)
}

/// Follows parent links from an unreachable node to the cycle it hangs off,
/// returning the cycle member that sorts first in display order.
fn cycle_entry(start: usize, parent: &[Option<usize>]) -> usize {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current) {
        match parent[current] {
            Some(p) => current = p,
            None => return current,
        }
    }

    let mut entry = current;
    let mut member = current;
    while let Some(p) = parent[member] {
        if p == current {
            break;
        }
        entry = entry.min(p);
        member = p;
    }
    entry
}

/// Keeps nodes matching `query` plus their ancestors.
///
/// A blank query returns the forest unchanged. Statistics on kept nodes still
/// describe the unfiltered subtree.
pub fn filter_forest(forest: &[InvitationNode], query: &str) -> Vec<InvitationNode> {
    let Some(needle) = normalize_search_query(query) else {
        return forest.to_vec();
    };
    forest
        .iter()
        .filter_map(|root| filter_tree(root, &needle))
        .collect()
}

fn filter_tree(root: &InvitationNode, needle: &str) -> Option<InvitationNode> {
    // (node, next child to visit, kept children)
    let mut stack: Vec<(&InvitationNode, usize, Vec<InvitationNode>)> = vec![(root, 0, Vec::new())];
    loop {
        let frame = stack.last_mut()?;
        let node: &InvitationNode = frame.0;
        if let Some(child) = node.children.get(frame.1) {
            frame.1 += 1;
            stack.push((child, 0, Vec::new()));
            continue;
        }

        let (node, _, children) = stack.pop()?;
        let matched = node.identity.matches_query(needle);
        let kept = (matched || !children.is_empty()).then(|| InvitationNode {
            identity: node.identity.clone(),
            children,
            total_descendants: node.total_descendants,
            max_depth: node.max_depth,
            matched,
        });
        match stack.last_mut() {
            Some(parent) => parent.2.extend(kept),
            None => return kept,
        }
    }
}

/// Aggregate statistics for a forest, with the `top_n` most active inviters.
pub fn summarize_forest(forest: &[InvitationNode], top_n: usize) -> ForestSummary {
    let mut total_identities = 0;
    let mut inviters: Vec<&InvitationNode> = Vec::new();
    let mut stack: Vec<&InvitationNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        total_identities += 1;
        if !node.children.is_empty() {
            inviters.push(node);
        }
        stack.extend(node.children.iter());
    }

    inviters.sort_by(|a, b| {
        b.children
            .len()
            .cmp(&a.children.len())
            .then_with(|| b.total_descendants.cmp(&a.total_descendants))
            .then_with(|| a.identity.last_name.to_lowercase().cmp(&b.identity.last_name.to_lowercase()))
            .then_with(|| a.identity.first_name.to_lowercase().cmp(&b.identity.first_name.to_lowercase()))
            .then_with(|| a.identity.id.cmp(&b.identity.id))
    });

    ForestSummary {
        total_identities,
        root_count: forest.len(),
        invited_count: total_identities - forest.len(),
        largest_tree_size: forest.iter().map(InvitationNode::tree_size).max().unwrap_or(0),
        deepest_chain: forest.iter().map(|root| root.max_depth).max().unwrap_or(0),
        top_inviters: inviters
            .into_iter()
            .take(top_n)
            .map(|node| InviterRanking {
                identity: node.identity.clone(),
                direct_invitees: node.children.len(),
                total_descendants: node.total_descendants,
            })
            .collect(),
    }
}

/// Loads identities and edges from storage and builds views over them.
#[derive(Debug, Clone)]
pub struct InvitationGraphService<I, V> {
    identities: I,
    invitations: V,
}

impl<I: IdentityStore, V: InvitationStore> InvitationGraphService<I, V> {
    pub fn new(identities: I, invitations: V) -> Self {
        Self {
            identities,
            invitations,
        }
    }

    /// The full forest, filtered when `search` is non-blank.
    pub async fn forest(&self, search: Option<&str>) -> Result<Vec<InvitationNode>, StoreError> {
        let identities = self.identities.list_identities().await?;
        let edges = self.invitations.list_invitations().await?;

        let forest = build_forest(&edges, &identities);
        debug!(
            identities = identities.len(),
            edges = edges.len(),
            roots = forest.len(),
            "Built invitation forest"
        );

        Ok(match search {
            Some(query) => filter_forest(&forest, query),
            None => forest,
        })
    }

    pub async fn summary(&self, top_n: usize) -> Result<ForestSummary, StoreError> {
        let forest = self.forest(None).await?;
        Ok(summarize_forest(&forest, top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::fixtures::{account, placeholder};
    use crate::models::invitation::fixtures::edge;
    use crate::services::memory_store::InMemoryDirectory;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    fn invite(inviter: &Identity, invitee: &Identity, minutes: i64) -> InvitationEdge {
        edge(inviter.id, &invitee.email, t0() + Duration::minutes(minutes))
    }

    fn find<'a>(forest: &'a [InvitationNode], id: Uuid) -> Option<&'a InvitationNode> {
        let mut stack: Vec<&InvitationNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            if node.identity.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    fn count(forest: &[InvitationNode]) -> usize {
        forest.iter().map(InvitationNode::tree_size).sum()
    }

    fn assert_stats(node: &InvitationNode) {
        let total: usize = node.children.iter().map(|c| 1 + c.total_descendants).sum();
        let depth = node.children.iter().map(|c| 1 + c.max_depth).max().unwrap_or(0);
        assert_eq!(node.total_descendants, total);
        assert_eq!(node.max_depth, depth);
        node.children.iter().for_each(assert_stats);
    }

    #[test]
    fn test_single_identity_is_leaf_root() {
        let alice = account("Alice", "Adams", "alice@example.edu");
        let forest = build_forest(&[], &[alice.clone()]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].identity.id, alice.id);
        assert_eq!(forest[0].total_descendants, 0);
        assert_eq!(forest[0].max_depth, 0);
    }

    #[test]
    fn test_chain_and_siblings() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let d = account("Dan", "Diaz", "dan@example.edu");
        let e = account("Eve", "Evans", "eve@example.edu");
        let edges = vec![invite(&a, &b, 1), invite(&b, &c, 2), invite(&a, &d, 3)];

        let forest = build_forest(&edges, &[e.clone(), d.clone(), c.clone(), b.clone(), a.clone()]);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].identity.id, a.id);
        assert_eq!(forest[1].identity.id, e.id);
        assert_eq!(forest[0].total_descendants, 3);
        assert_eq!(forest[0].max_depth, 2);
        let names: Vec<&str> = forest[0]
            .children
            .iter()
            .map(|n| n.identity.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["Bob", "Dan"]);
        forest.iter().for_each(assert_stats);
        assert_eq!(count(&forest), 5);
    }

    #[test]
    fn test_dangling_and_self_edges_are_ignored() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let edges = vec![
            edge(Uuid::new_v4(), &b.email, t0()),
            edge(a.id, "stranger@example.edu", t0()),
            invite(&a, &a, 0),
        ];

        let forest = build_forest(&edges, &[a.clone(), b.clone()]);
        assert_eq!(forest.len(), 2);
        assert!(forest.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_invitee_email_is_case_insensitive() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "Bob.Brown@Example.edu");
        let edges = vec![edge(a.id, "bob.brown@example.EDU", t0())];

        let forest = build_forest(&edges, &[a.clone(), b.clone()]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].identity.id, b.id);
    }

    #[test]
    fn test_accepted_edge_chooses_parent() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let early = invite(&a, &c, 0);
        let mut accepted = invite(&b, &c, 30);
        accepted.used_at = Some(t0() + Duration::hours(1));

        let forest = build_forest(&[early, accepted], &[a.clone(), b.clone(), c.clone()]);
        let bob = find(&forest, b.id).unwrap();
        assert_eq!(bob.children[0].identity.id, c.id);
        assert!(find(&forest, a.id).unwrap().children.is_empty());
        assert_eq!(count(&forest), 3);
    }

    #[test]
    fn test_earliest_edge_chooses_parent() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let edges = vec![invite(&b, &c, 10), invite(&a, &c, 5)];

        let forest = build_forest(&edges, &[a.clone(), b.clone(), c.clone()]);
        assert_eq!(find(&forest, a.id).unwrap().children.len(), 1);
        assert!(find(&forest, b.id).unwrap().children.is_empty());
    }

    #[test]
    fn test_account_preferred_over_placeholder_with_same_email() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let real = account("Bob", "Brown", "bob@example.edu");
        let stale = placeholder("Bob", "Brown", "bob@example.edu");
        let edges = vec![invite(&a, &real, 0)];

        let forest = build_forest(&edges, &[stale.clone(), a.clone(), real.clone()]);
        let alice = find(&forest, a.id).unwrap();
        assert_eq!(alice.children[0].identity.id, real.id);
        assert!(forest.iter().any(|n| n.identity.id == stale.id));
    }

    #[test]
    fn test_cycle_is_broken() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let edges = vec![invite(&a, &b, 0), invite(&b, &c, 1), invite(&c, &a, 2)];

        let forest = build_forest(&edges, &[a.clone(), b.clone(), c.clone()]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].identity.id, a.id);
        assert_eq!(forest[0].total_descendants, 2);
        assert_eq!(forest[0].max_depth, 2);
        assert_eq!(count(&forest), 3);
    }

    #[test]
    fn test_cycle_root_follows_display_order_not_input_order() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let edges = vec![invite(&c, &b, 0), invite(&b, &a, 1), invite(&a, &c, 2)];

        let forest = build_forest(&edges, &[c.clone(), b.clone(), a.clone()]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].identity.id, a.id);
        assert_eq!(forest[0].children[0].identity.id, c.id);
        assert_eq!(forest[0].max_depth, 2);
    }

    #[test]
    fn test_cycle_with_hanging_branch() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let z = account("Zed", "Zimmer", "zed@example.edu");
        let aaron = account("Aaron", "Aalto", "aaron@example.edu");
        let edges = vec![
            invite(&z, &b, 0),
            invite(&b, &z, 1),
            invite(&b, &aaron, 2),
            invite(&a, &a, 3),
        ];

        let forest = build_forest(&edges, &[a.clone(), b.clone(), z.clone(), aaron.clone()]);

        assert_eq!(count(&forest), 4);
        let cycle_root = forest.iter().find(|n| n.identity.id == b.id).unwrap();
        assert_eq!(cycle_root.total_descendants, 2);
        forest.iter().for_each(assert_stats);
    }

    #[test]
    fn test_long_chain_is_split_at_depth_limit() {
        let people: Vec<Identity> = (0..5000)
            .map(|i| account("Ta", &format!("Chain{:05}", i), &format!("ta{}@example.edu", i)))
            .collect();
        let edges: Vec<InvitationEdge> = (1..people.len())
            .map(|i| invite(&people[i - 1], &people[i], i as i64))
            .collect();

        let forest = build_forest(&edges, &people);

        assert_eq!(forest.len(), 10);
        assert_eq!(forest[0].identity.id, people[0].id);
        assert_eq!(forest[0].max_depth, MAX_FOREST_DEPTH - 1);
        assert_eq!(forest[0].total_descendants, MAX_FOREST_DEPTH - 1);
        assert_eq!(forest[1].identity.id, people[MAX_FOREST_DEPTH].id);
        assert!(forest.iter().all(|root| root.max_depth < MAX_FOREST_DEPTH));

        let summary = summarize_forest(&forest, 3);
        assert_eq!(summary.total_identities, 5000);
        assert_eq!(summary.deepest_chain, MAX_FOREST_DEPTH - 1);

        let filtered = filter_forest(&forest, "chain04999");
        assert_eq!(filtered.len(), 1);
        let mut node = &filtered[0];
        while let Some(child) = node.children.first() {
            node = child;
        }
        assert!(node.matched);
        assert_eq!(node.identity.id, people[4999].id);
    }

    #[test]
    fn test_every_identity_appears_once() {
        let people: Vec<Identity> = (0..20)
            .map(|i| account("Person", &format!("P{:02}", i), &format!("p{}@example.edu", i)))
            .collect();
        let mut edges = Vec::new();
        for i in 1..people.len() {
            edges.push(invite(&people[i / 2], &people[i], i as i64));
            edges.push(invite(&people[(i + 7) % people.len()], &people[i], 100 + i as i64));
        }

        let forest = build_forest(&edges, &people);
        assert_eq!(count(&forest), people.len());
        let mut ids: Vec<Uuid> = Vec::new();
        let mut stack: Vec<&InvitationNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            ids.push(node.identity.id);
            stack.extend(node.children.iter());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), people.len());
        forest.iter().for_each(assert_stats);
    }

    #[test]
    fn test_filter_keeps_ancestor_chain() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let d = account("Dan", "Diaz", "dan@example.edu");
        let edges = vec![invite(&a, &b, 0), invite(&b, &c, 1), invite(&a, &d, 2)];
        let forest = build_forest(&edges, &[a.clone(), b.clone(), c.clone(), d.clone()]);
        let before = forest.clone();

        let filtered = filter_forest(&forest, "  CAROL ");

        assert_eq!(forest, before);
        assert_eq!(filtered.len(), 1);
        let alice = &filtered[0];
        assert!(!alice.matched);
        assert_eq!(alice.children.len(), 1);
        assert_eq!(alice.total_descendants, 3);
        let bob = &alice.children[0];
        assert_eq!(bob.identity.id, b.id);
        assert!(bob.children[0].matched);
        assert_eq!(bob.children[0].identity.id, c.id);
    }

    #[test]
    fn test_filter_matches_email_and_full_name() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@other.org");
        let forest = build_forest(&[invite(&a, &b, 0)], &[a.clone(), b.clone()]);

        assert_eq!(filter_forest(&forest, "other.org").len(), 1);
        assert_eq!(filter_forest(&forest, "alice adams").len(), 1);
        assert!(filter_forest(&forest, "nobody").is_empty());
        assert_eq!(filter_forest(&forest, "   "), forest);
    }

    #[test]
    fn test_summary() {
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        let c = account("Carol", "Chen", "carol@example.edu");
        let d = account("Dan", "Diaz", "dan@example.edu");
        let e = account("Eve", "Evans", "eve@example.edu");
        let edges = vec![invite(&a, &b, 0), invite(&a, &c, 1), invite(&b, &d, 2)];
        let forest = build_forest(&edges, &[a.clone(), b.clone(), c.clone(), d.clone(), e.clone()]);

        let summary = summarize_forest(&forest, DEFAULT_TOP_INVITERS);

        assert_eq!(summary.total_identities, 5);
        assert_eq!(summary.root_count, 2);
        assert_eq!(summary.invited_count, 3);
        assert_eq!(summary.largest_tree_size, 4);
        assert_eq!(summary.deepest_chain, 2);
        assert_eq!(summary.top_inviters.len(), 2);
        assert_eq!(summary.top_inviters[0].identity.id, a.id);
        assert_eq!(summary.top_inviters[0].direct_invitees, 2);
        assert_eq!(summary.top_inviters[1].identity.id, b.id);

        assert_eq!(summarize_forest(&forest, 1).top_inviters.len(), 1);
        assert_eq!(summarize_forest(&[], 5), ForestSummary::default());
    }

    #[tokio::test]
    async fn test_service_loads_from_store() {
        let directory = InMemoryDirectory::new();
        let a = account("Alice", "Adams", "alice@example.edu");
        let b = account("Bob", "Brown", "bob@example.edu");
        directory.insert_identity(a.clone()).await;
        directory.insert_identity(b.clone()).await;
        directory.insert_invitation(invite(&a, &b, 0)).await;

        let service = InvitationGraphService::new(directory.clone(), directory);
        let forest = service.forest(None).await.unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].identity.id, b.id);

        let filtered = service.forest(Some("bob")).await.unwrap();
        assert!(filtered[0].children[0].matched);

        let summary = service.summary(DEFAULT_TOP_INVITERS).await.unwrap();
        assert_eq!(summary.total_identities, 2);
    }
}
