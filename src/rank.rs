//! Leader ranking built on the referral graph.

pub mod leaderboard;
