use crate::core::user::{UserId, UserRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while assembling a batch of user records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// Two records in the same batch share an id.
    #[error("duplicate user id in batch: {id}")]
    DuplicateUserId { id: UserId },
}

/// A snapshot of user records fetched from the backend in one call.
///
/// Ids are unique within a batch; record order is the backend's fetch
/// order and is preserved through every aggregation built on top.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserBatch {
    users: Vec<UserRecord>,
}

impl UserBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    /// Build a batch from records, rejecting duplicate ids.
    pub fn from_records(users: Vec<UserRecord>) -> Result<Self, BatchError> {
        let mut seen = HashSet::new();
        for user in &users {
            if !seen.insert(user.id().clone()) {
                return Err(BatchError::DuplicateUserId {
                    id: user.id().clone(),
                });
            }
        }
        Ok(Self { users })
    }

    /// All records in backend fetch order.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Sum of invested capital across the batch.
    pub fn total_invested(&self) -> Decimal {
        self.users.iter().map(|u| u.total_invested()).sum()
    }

    /// Sum of credited earnings across the batch.
    pub fn total_earned(&self) -> Decimal {
        self.users.iter().map(|u| u.total_earned()).sum()
    }

    /// All user ids, sorted for stable output.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.iter().map(|u| u.id().clone()).collect();
        ids.sort();
        ids
    }
}

impl<'de> Deserialize<'de> for UserBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            users: Vec<UserRecord>,
        }

        let wire = Wire::deserialize(deserializer)?;
        Self::from_records(wire.users).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_batch() {
        let batch = UserBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.total_invested(), Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = UserBatch::from_records(vec![
            UserRecord::new("u-1"),
            UserRecord::new("u-2"),
            UserRecord::new("u-1"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            BatchError::DuplicateUserId {
                id: UserId::new("u-1")
            }
        );
    }

    #[test]
    fn test_batch_totals() {
        let batch = UserBatch::from_records(vec![
            UserRecord::new("u-1").with_invested(dec!(1000)).with_earned(dec!(50)),
            UserRecord::new("u-2").with_invested(dec!(250.25)),
        ])
        .unwrap();
        assert_eq!(batch.total_invested(), dec!(1250.25));
        assert_eq!(batch.total_earned(), dec!(50));
    }

    #[test]
    fn test_deserialize_enforces_uniqueness() {
        let result: Result<UserBatch, _> = serde_json::from_str(
            r#"{"users":[
                {"id":"u-1","createdAt":"2024-03-01T10:00:00Z"},
                {"id":"u-1","createdAt":"2024-03-02T10:00:00Z"}
            ]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_user_ids_sorted() {
        let batch = UserBatch::from_records(vec![
            UserRecord::new("u-3"),
            UserRecord::new("u-1"),
            UserRecord::new("u-2"),
        ])
        .unwrap();
        let ids = batch.user_ids();
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["u-1", "u-2", "u-3"]);
    }
}
