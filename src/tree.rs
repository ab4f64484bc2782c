//! Bounded-depth team views and per-level tallies.

pub mod levels;
pub mod team_tree;
