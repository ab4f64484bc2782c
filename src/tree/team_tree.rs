use crate::core::user::{UserId, UserRecord};
use crate::graph::referral_graph::ReferralGraph;
use serde::Serialize;
use std::collections::HashSet;

/// Deepest level a team view expands to by default.
pub const MAX_TEAM_TREE_DEPTH: usize = 4;

/// One user in a materialized team view.
///
/// `depth` is the distance from the queried root; direct invitees sit
/// at depth 1. Children keep batch order.
#[derive(Debug, Clone, Serialize)]
pub struct TeamTreeNode {
    user: UserRecord,
    depth: usize,
    children: Vec<TeamTreeNode>,
}

impl TeamTreeNode {
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[TeamTreeNode] {
        &self.children
    }

    /// This node plus all nodes beneath it.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TeamTreeNode::node_count).sum::<usize>()
    }
}

/// Materialize the team under `root` down to the default depth.
pub fn materialize_team_tree(graph: &ReferralGraph, root: &UserId) -> Vec<TeamTreeNode> {
    materialize_with_depth(graph, root, MAX_TEAM_TREE_DEPTH)
}

/// Materialize the team under `root` down to `max_depth` levels.
///
/// Each user appears at most once; on cyclic or duplicated referral
/// data the first visit wins and later occurrences are pruned. A
/// `max_depth` of zero yields an empty forest.
pub fn materialize_with_depth(
    graph: &ReferralGraph,
    root: &UserId,
    max_depth: usize,
) -> Vec<TeamTreeNode> {
    let mut visited = HashSet::new();
    visited.insert(root.clone());
    expand(graph, root, 1, max_depth, &mut visited)
}

fn expand(
    graph: &ReferralGraph,
    inviter: &UserId,
    depth: usize,
    max_depth: usize,
    visited: &mut HashSet<UserId>,
) -> Vec<TeamTreeNode> {
    if depth > max_depth {
        return Vec::new();
    }

    let mut nodes = Vec::new();
    for invitee in graph.direct_invitees(inviter) {
        // Guards against cycles and against one user reached twice.
        if !visited.insert(invitee.id().clone()) {
            continue;
        }
        let children = expand(graph, invitee.id(), depth + 1, max_depth, visited);
        nodes.push(TeamTreeNode {
            user: invitee.clone(),
            depth,
            children,
        });
    }
    nodes
}

/// Total nodes across a forest of team trees.
pub fn total_nodes(forest: &[TeamTreeNode]) -> usize {
    forest.iter().map(TeamTreeNode::node_count).sum()
}
