use crate::core::user::UserId;
use crate::graph::referral_graph::ReferralGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A set of users whose referral records form a cycle.
///
/// Referral data is acyclic when healthy; a cycle means the backend
/// accepted corrupt records. The traversals elsewhere in this crate
/// tolerate cycles, so a cycle is an audit finding, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralCycle {
    members: Vec<UserId>,
}

impl ReferralCycle {
    fn new(members: Vec<UserId>) -> Self {
        Self { members }
    }

    /// Members in referral order, starting from the smallest id.
    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when a user is recorded as their own referrer.
    pub fn is_self_referral(&self) -> bool {
        self.members.len() == 1
    }
}

impl fmt::Display for ReferralCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.members.iter().map(|id| id.as_str()).collect();
        write!(f, "{}", path.join(" -> "))?;
        if let Some(first) = path.first() {
            write!(f, " -> {}", first)?;
        }
        Ok(())
    }
}

/// Find every referral cycle in the graph.
///
/// Runs Tarjan's strongly-connected-components algorithm over the
/// edge index; a component is a cycle when it has more than one
/// member, or a single member with an edge to itself. Results are
/// sorted for stable output.
pub fn find_referral_cycles(graph: &ReferralGraph) -> Vec<ReferralCycle> {
    let mut dg: DiGraph<UserId, ()> = DiGraph::new();
    let mut nodes: HashMap<&UserId, NodeIndex> = HashMap::new();

    for inviter in graph.inviter_ids() {
        for invitee in graph.direct_invitees(inviter) {
            let from = *nodes
                .entry(inviter)
                .or_insert_with(|| dg.add_node(inviter.clone()));
            let to = *nodes
                .entry(invitee.id())
                .or_insert_with(|| dg.add_node(invitee.id().clone()));
            dg.add_edge(from, to, ());
        }
    }

    let mut cycles: Vec<ReferralCycle> = tarjan_scc(&dg)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || dg.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let members = component.into_iter().map(|n| dg[n].clone()).collect();
            ReferralCycle::new(ring_order(graph, members))
        })
        .collect();

    cycles.sort_by(|a, b| a.members.cmp(&b.members));
    if !cycles.is_empty() {
        log::warn!("referral data contains {} cycle(s)", cycles.len());
    }
    cycles
}

/// Order cycle members by following referral edges from the smallest
/// id. Every user has at most one referrer, so a strongly connected
/// component here is always a simple ring.
fn ring_order(graph: &ReferralGraph, members: Vec<UserId>) -> Vec<UserId> {
    if members.len() <= 1 {
        return members;
    }

    let pool: HashSet<&UserId> = members.iter().collect();
    let mut ordered = Vec::with_capacity(members.len());
    let mut current = match members.iter().min() {
        Some(start) => start.clone(),
        None => return members,
    };

    while ordered.len() < members.len() {
        ordered.push(current.clone());
        let next = graph
            .direct_invitees(&current)
            .iter()
            .map(|u| u.id())
            .find(|id| pool.contains(*id) && !ordered.contains(*id));
        match next {
            Some(id) => current = id.clone(),
            None => break,
        }
    }

    if ordered.len() < members.len() {
        let mut rest: Vec<UserId> = members
            .into_iter()
            .filter(|m| !ordered.contains(m))
            .collect();
        rest.sort();
        ordered.extend(rest);
    }

    ordered
}

/// Whether the graph contains any referral cycle.
pub fn has_referral_cycles(graph: &ReferralGraph) -> bool {
    !find_referral_cycles(graph).is_empty()
}
