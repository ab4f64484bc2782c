//! # referral-engine
//!
//! Referral network aggregation and team analytics engine.
//!
//! Given a flat batch of user records with embedded referrer
//! references, this engine indexes who invited whom, sizes whole
//! downline teams, ranks top leaders, and materializes bounded-depth
//! team views.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: users, referrer references, batches
//! - **graph** — Referral edge index, team sizing, cycle audits
//! - **rank** — Two-phase leaderboard ranking
//! - **tree** — Bounded-depth team views and level tallies
//! - **simulation** — Synthetic network generation

pub mod core;
pub mod graph;
pub mod rank;
pub mod simulation;
pub mod tree;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::batch::{BatchError, UserBatch};
    pub use crate::core::user::{ReferrerRef, ReferrerSummary, UserId, UserRecord};
    pub use crate::graph::cycle_audit::{find_referral_cycles, has_referral_cycles, ReferralCycle};
    pub use crate::graph::referral_graph::ReferralGraph;
    pub use crate::graph::team_size::TeamSizeCache;
    pub use crate::rank::leaderboard::{
        LeaderCandidate, LeaderRanker, Leaderboard, RankingConfig,
    };
    pub use crate::tree::levels::LevelCounts;
    pub use crate::tree::team_tree::{
        materialize_team_tree, materialize_with_depth, total_nodes, TeamTreeNode,
        MAX_TEAM_TREE_DEPTH,
    };
}
