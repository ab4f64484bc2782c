//! Synthetic referral networks for tests, benches, and demos.
//!
//! Generates random user batches shaped like real platform exports.
//! Referrers are always drawn from earlier signups, so generated
//! networks are acyclic by construction.

use crate::core::batch::UserBatch;
use crate::core::user::{ReferrerRef, UserRecord};
use chrono::{Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Configuration for generating a random referral network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of users to generate.
    pub user_count: usize,
    /// Probability that a user joined through a referral.
    pub referral_rate: f64,
    /// Probability that a referred user carries only a raw code.
    pub legacy_code_rate: f64,
    /// Minimum invested amount per user.
    pub min_invested: Decimal,
    /// Maximum invested amount per user.
    pub max_invested: Decimal,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_count: 50,
            referral_rate: 0.7,
            legacy_code_rate: 0.1,
            min_invested: Decimal::from(100),
            max_invested: Decimal::from(250_000),
        }
    }
}

/// Generate a random referral network for testing.
pub fn generate_random_network(config: &NetworkConfig) -> UserBatch {
    let mut rng = rand::thread_rng();
    let mut users: Vec<UserRecord> = Vec::with_capacity(config.user_count);

    let min_f64: f64 = config.min_invested.to_string().parse().unwrap_or(100.0);
    let max_f64: f64 = config.max_invested.to_string().parse().unwrap_or(250_000.0);

    for i in 0..config.user_count {
        let mut user = UserRecord::new(format!("USER-{:04}", i));

        // Some users never filled in a profile; team views fall back
        // to email or the raw id for those.
        if rng.gen_bool(0.85) {
            user = user.with_name(format!("member{:04}", i));
        } else if rng.gen_bool(0.5) {
            user = user.with_email(format!("user{:04}@example.com", i));
        }

        if i > 0 && rng.gen_bool(config.referral_rate) {
            user = if rng.gen_bool(config.legacy_code_rate) {
                user.with_referrer(ReferrerRef::legacy(mint_referral_code()))
            } else {
                let inviter = users[rng.gen_range(0..i)].id().clone();
                user.with_referrer(ReferrerRef::resolved(inviter))
            };
        }

        let invested_f64 = rng.gen_range(min_f64..max_f64);
        let invested = Decimal::from_f64_retain(invested_f64)
            .unwrap_or(Decimal::from(100))
            .round_dp(2);
        let earned = (invested * Decimal::new(rng.gen_range(0..35), 2)).round_dp(2);

        users.push(
            user.with_invested(invested)
                .with_earned(earned)
                .with_created_at(Utc::now() - Duration::days(rng.gen_range(0..365i64))),
        );
    }

    UserBatch::from_records(users).expect("generated ids are sequential and unique")
}

/// Mint a referral code in the backend's short format.
pub fn mint_referral_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(8);
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::cycle_audit::has_referral_cycles;
    use crate::graph::referral_graph::ReferralGraph;
    use crate::graph::team_size::TeamSizeCache;
    use crate::rank::leaderboard::LeaderRanker;

    #[test]
    fn test_random_network_generation() {
        let config = NetworkConfig {
            user_count: 40,
            ..Default::default()
        };

        let batch = generate_random_network(&config);
        assert_eq!(batch.len(), 40);
        for user in batch.users() {
            assert!(user.total_invested() >= config.min_invested);
            assert!(user.total_invested() <= config.max_invested);
        }
    }

    #[test]
    fn test_generated_network_is_acyclic() {
        let batch = generate_random_network(&NetworkConfig {
            user_count: 200,
            referral_rate: 0.9,
            legacy_code_rate: 0.0,
            ..Default::default()
        });
        let graph = ReferralGraph::from_batch(&batch);

        assert!(!has_referral_cycles(&graph));
    }

    #[test]
    fn test_zero_referral_rate_is_all_organic() {
        let batch = generate_random_network(&NetworkConfig {
            user_count: 30,
            referral_rate: 0.0,
            ..Default::default()
        });
        let graph = ReferralGraph::from_batch(&batch);

        assert_eq!(graph.organic_count(), 30);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_random_network_ranking() {
        let batch = generate_random_network(&NetworkConfig {
            user_count: 100,
            referral_rate: 0.8,
            legacy_code_rate: 0.0,
            ..Default::default()
        });
        let graph = ReferralGraph::from_batch(&batch);
        let mut cache = TeamSizeCache::new();
        let board = LeaderRanker::rank(&graph, &mut cache);

        assert!(board.len() <= 8);
        for leader in board.leaders() {
            assert!(leader.team_size >= leader.direct_invitees);
        }
    }

    #[test]
    fn test_minted_codes_are_short_and_distinct() {
        let a = mint_referral_code();
        let b = mint_referral_code();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }
}
