use crate::core::user::UserId;
use crate::graph::referral_graph::ReferralGraph;
use std::collections::{HashMap, HashSet};

/// Computes downline team sizes with per-instance memoization.
///
/// Team size is the number of distinct users reachable from a root
/// through referral edges, excluding the root itself. Traversal is
/// iterative with an explicit stack, so chains as deep as the user
/// count cannot overflow the call stack, and a visited set makes it
/// terminate even on cyclic or duplicated referral data.
///
/// A cache instance is only valid for the graph it was queried
/// against. Call [`invalidate`](Self::invalidate) after rebuilding the
/// graph from a fresh batch, or drop the cache and start a new one.
#[derive(Debug, Clone, Default)]
pub struct TeamSizeCache {
    sizes: HashMap<UserId, usize>,
    traversals: usize,
}

impl TeamSizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the team rooted at `root`, memoized per root.
    pub fn team_size(&mut self, graph: &ReferralGraph, root: &UserId) -> usize {
        if let Some(&size) = self.sizes.get(root) {
            return size;
        }

        self.traversals += 1;
        let mut visited: HashSet<&UserId> = HashSet::new();
        visited.insert(root);
        let mut stack = vec![root];
        let mut count = 0;

        while let Some(current) = stack.pop() {
            for invitee in graph.direct_invitees(current) {
                if visited.insert(invitee.id()) {
                    count += 1;
                    stack.push(invitee.id());
                }
            }
        }

        log::trace!("sized team of {} at {} (traversal {})", root, count, self.traversals);
        self.sizes.insert(root.clone(), count);
        count
    }

    /// Drop all memoized sizes. The traversal counter is cumulative
    /// and survives invalidation.
    pub fn invalidate(&mut self) {
        self.sizes.clear();
    }

    /// How many full traversals this cache has run.
    pub fn traversal_count(&self) -> usize {
        self.traversals
    }

    /// Whether a size for `root` is currently memoized.
    pub fn is_cached(&self, root: &UserId) -> bool {
        self.sizes.contains_key(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::UserBatch;
    use crate::core::user::{ReferrerRef, UserRecord};

    fn chain_batch() -> UserBatch {
        // A -> B -> C -> D
        UserBatch::from_records(vec![
            UserRecord::new("A"),
            UserRecord::new("B").with_referrer(ReferrerRef::resolved("A")),
            UserRecord::new("C").with_referrer(ReferrerRef::resolved("B")),
            UserRecord::new("D").with_referrer(ReferrerRef::resolved("C")),
        ])
        .unwrap()
    }

    #[test]
    fn test_chain_sizes() {
        let graph = ReferralGraph::from_batch(&chain_batch());
        let mut cache = TeamSizeCache::new();

        assert_eq!(cache.team_size(&graph, &UserId::new("A")), 3);
        assert_eq!(cache.team_size(&graph, &UserId::new("B")), 2);
        assert_eq!(cache.team_size(&graph, &UserId::new("C")), 1);
        assert_eq!(cache.team_size(&graph, &UserId::new("D")), 0);
    }

    #[test]
    fn test_memoization_skips_second_traversal() {
        let graph = ReferralGraph::from_batch(&chain_batch());
        let mut cache = TeamSizeCache::new();
        let root = UserId::new("A");

        let first = cache.team_size(&graph, &root);
        assert_eq!(cache.traversal_count(), 1);
        let second = cache.team_size(&graph, &root);
        assert_eq!(first, second);
        assert_eq!(cache.traversal_count(), 1);
        assert!(cache.is_cached(&root));
    }

    #[test]
    fn test_only_the_queried_root_is_memoized() {
        let graph = ReferralGraph::from_batch(&chain_batch());
        let mut cache = TeamSizeCache::new();

        cache.team_size(&graph, &UserId::new("A"));
        assert!(!cache.is_cached(&UserId::new("B")));
        cache.team_size(&graph, &UserId::new("B"));
        assert_eq!(cache.traversal_count(), 2);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let graph = ReferralGraph::from_batch(&chain_batch());
        let mut cache = TeamSizeCache::new();
        let root = UserId::new("A");

        assert_eq!(cache.team_size(&graph, &root), 3);
        cache.invalidate();
        assert!(!cache.is_cached(&root));
        assert_eq!(cache.team_size(&graph, &root), 3);
        assert_eq!(cache.traversal_count(), 2);
    }

    #[test]
    fn test_cycle_terminates() {
        // A and B refer each other; the data is corrupt but the
        // traversal must still finish.
        let batch = UserBatch::from_records(vec![
            UserRecord::new("A").with_referrer(ReferrerRef::resolved("B")),
            UserRecord::new("B").with_referrer(ReferrerRef::resolved("A")),
        ])
        .unwrap();
        let graph = ReferralGraph::from_batch(&batch);
        let mut cache = TeamSizeCache::new();

        assert_eq!(cache.team_size(&graph, &UserId::new("A")), 1);
        assert_eq!(cache.team_size(&graph, &UserId::new("B")), 1);
    }

    #[test]
    fn test_self_referral_not_counted() {
        let batch = UserBatch::from_records(vec![
            UserRecord::new("S").with_referrer(ReferrerRef::resolved("S"))
        ])
        .unwrap();
        let graph = ReferralGraph::from_batch(&batch);
        let mut cache = TeamSizeCache::new();

        assert_eq!(cache.team_size(&graph, &UserId::new("S")), 0);
    }

    #[test]
    fn test_unknown_root_has_empty_team() {
        let graph = ReferralGraph::from_batch(&chain_batch());
        let mut cache = TeamSizeCache::new();
        assert_eq!(cache.team_size(&graph, &UserId::new("ghost")), 0);
    }

    #[test]
    fn test_branching_team() {
        let batch = UserBatch::from_records(vec![
            UserRecord::new("A"),
            UserRecord::new("B").with_referrer(ReferrerRef::resolved("A")),
            UserRecord::new("C").with_referrer(ReferrerRef::resolved("A")),
            UserRecord::new("D").with_referrer(ReferrerRef::resolved("B")),
        ])
        .unwrap();
        let graph = ReferralGraph::from_batch(&batch);
        let mut cache = TeamSizeCache::new();

        assert_eq!(cache.team_size(&graph, &UserId::new("A")), 3);
        assert_eq!(cache.team_size(&graph, &UserId::new("C")), 0);
    }
}
