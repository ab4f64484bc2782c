use crate::core::batch::UserBatch;
use crate::core::user::{UserId, UserRecord};
use std::collections::HashMap;

/// Index of referral relationships extracted from one batch of users.
///
/// Maps each inviter to the users they directly brought in, in batch
/// order. Built once per batch in a single pass; lookups are O(1).
///
/// Users whose `referredBy` is absent or an unresolved code carry no
/// incoming edge and are classified organic. An inviter id that never
/// appears as a user of its own still gets a bucket, so a partial
/// fetch does not hide its invitees.
#[derive(Debug, Clone)]
pub struct ReferralGraph {
    invitees: HashMap<UserId, Vec<UserRecord>>,
    users: HashMap<UserId, UserRecord>,
    organic: Vec<UserId>,
    edge_count: usize,
}

impl ReferralGraph {
    /// Build the index from a batch of user records.
    pub fn from_batch(batch: &UserBatch) -> Self {
        let mut invitees: HashMap<UserId, Vec<UserRecord>> = HashMap::new();
        let mut users = HashMap::with_capacity(batch.len());
        let mut organic = Vec::new();
        let mut edge_count = 0;

        for user in batch.users() {
            match user.referred_by().resolved_id() {
                Some(inviter) => {
                    invitees
                        .entry(inviter.clone())
                        .or_default()
                        .push(user.clone());
                    edge_count += 1;
                }
                None => organic.push(user.id().clone()),
            }
            users.insert(user.id().clone(), user.clone());
        }

        log::debug!(
            "referral graph built: {} users, {} edges, {} inviters, {} organic",
            users.len(),
            edge_count,
            invitees.len(),
            organic.len()
        );

        Self {
            invitees,
            users,
            organic,
            edge_count,
        }
    }

    /// Users directly invited by `inviter`, in batch order.
    pub fn direct_invitees(&self, inviter: &UserId) -> &[UserRecord] {
        self.invitees
            .get(inviter)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of users directly invited by `inviter`.
    pub fn direct_count(&self, inviter: &UserId) -> usize {
        self.invitees.get(inviter).map(Vec::len).unwrap_or(0)
    }

    /// Every id with at least one direct invitee, sorted.
    pub fn inviter_ids(&self) -> Vec<&UserId> {
        let mut ids: Vec<&UserId> = self.invitees.keys().collect();
        ids.sort();
        ids
    }

    pub fn inviter_count(&self) -> usize {
        self.invitees.len()
    }

    /// Look up a user record by id.
    pub fn user(&self, id: &UserId) -> Option<&UserRecord> {
        self.users.get(id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Ids of users with no resolvable referrer, in batch order.
    pub fn organic_ids(&self) -> &[UserId] {
        &self.organic
    }

    pub fn organic_count(&self) -> usize {
        self.organic.len()
    }

    /// Total referral edges in the index.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl Default for ReferralGraph {
    fn default() -> Self {
        Self::from_batch(&UserBatch::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::ReferrerRef;

    fn sample_batch() -> UserBatch {
        UserBatch::from_records(vec![
            UserRecord::new("L"),
            UserRecord::new("A").with_referrer(ReferrerRef::resolved("L")),
            UserRecord::new("B").with_referrer(ReferrerRef::resolved("L")),
            UserRecord::new("C").with_referrer(ReferrerRef::resolved("A")),
        ])
        .unwrap()
    }

    #[test]
    fn test_buckets_follow_batch_order() {
        let graph = ReferralGraph::from_batch(&sample_batch());

        let direct: Vec<&str> = graph
            .direct_invitees(&UserId::new("L"))
            .iter()
            .map(|u| u.id().as_str())
            .collect();
        assert_eq!(direct, vec!["A", "B"]);
        assert_eq!(graph.direct_count(&UserId::new("A")), 1);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_organic_classification() {
        let batch = UserBatch::from_records(vec![
            UserRecord::new("u-1"),
            UserRecord::new("u-2").with_referrer(ReferrerRef::legacy("PROMO")),
            UserRecord::new("u-3").with_referrer(ReferrerRef::resolved("u-1")),
        ])
        .unwrap();
        let graph = ReferralGraph::from_batch(&batch);

        let organic: Vec<&str> = graph.organic_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(organic, vec!["u-1", "u-2"]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_dangling_inviter_keeps_bucket() {
        let batch = UserBatch::from_records(vec![
            UserRecord::new("u-1").with_referrer(ReferrerRef::resolved("ghost"))
        ])
        .unwrap();
        let graph = ReferralGraph::from_batch(&batch);

        assert_eq!(graph.direct_count(&UserId::new("ghost")), 1);
        assert!(graph.user(&UserId::new("ghost")).is_none());
    }

    #[test]
    fn test_empty_batch_builds_empty_graph() {
        let graph = ReferralGraph::from_batch(&UserBatch::new());
        assert_eq!(graph.user_count(), 0);
        assert_eq!(graph.inviter_count(), 0);
        assert!(graph.direct_invitees(&UserId::new("anyone")).is_empty());
    }

    #[test]
    fn test_inviter_ids_sorted() {
        let graph = ReferralGraph::from_batch(&sample_batch());
        let ids: Vec<&str> = graph.inviter_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["A", "L"]);
    }
}
