//! Referral graph construction, team sizing, and integrity audits.

pub mod cycle_audit;
pub mod referral_graph;
pub mod team_size;
