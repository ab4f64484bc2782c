//! Synthetic data generation.

pub mod network_gen;
