//! Core domain types: user records, referrer references, and batches.

pub mod batch;
pub mod user;
