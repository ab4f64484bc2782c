use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a user of the platform.
///
/// Backend-assigned and opaque to this engine; uniqueness is only
/// guaranteed within one fetched batch of records.
///
/// # Examples
///
/// ```
/// use referral_engine::core::user::UserId;
///
/// let a = UserId::new("u-1001");
/// let b = UserId::new("u-1002");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this user ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Summary of a referrer as embedded in a user record by the backend.
///
/// Always carries the referrer's id; name and referral code are present
/// only when the backend chose to populate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferrerSummary {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

impl ReferrerSummary {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            referral_code: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.referral_code = Some(code.into());
        self
    }
}

/// How a user was referred onto the platform.
///
/// The backend sends this as an untyped union: the field is absent or
/// `null`, a raw referral-code string, or an embedded referrer object.
/// Only the resolved form produces a graph edge; a raw code cannot be
/// mapped back to an inviter, so such users count as organic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferrerRef {
    /// No referrer recorded; the user signed up organically.
    None,
    /// A raw referral-code string the backend did not resolve.
    LegacyCode(String),
    /// A resolved referrer with at least an id.
    Resolved(ReferrerSummary),
}

impl ReferrerRef {
    /// A resolved referrer carrying only the given id.
    pub fn resolved(id: impl Into<UserId>) -> Self {
        Self::Resolved(ReferrerSummary::new(id))
    }

    /// An unresolved legacy code.
    pub fn legacy(code: impl Into<String>) -> Self {
        Self::LegacyCode(code.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The inviter id, if this reference resolves to one.
    pub fn resolved_id(&self) -> Option<&UserId> {
        match self {
            Self::Resolved(summary) => Some(&summary.id),
            Self::None | Self::LegacyCode(_) => None,
        }
    }
}

impl Default for ReferrerRef {
    fn default() -> Self {
        Self::None
    }
}

impl Serialize for ReferrerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::LegacyCode(code) => serializer.serialize_str(code),
            Self::Resolved(summary) => summary.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ReferrerRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything that is not a string or a well-formed referrer object
        // (null, numbers, objects without an id) degrades to organic
        // rather than failing the whole record.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Code(String),
            Resolved(ReferrerSummary),
            Other(IgnoredAny),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Code(code) => Self::LegacyCode(code),
            Wire::Resolved(summary) => Self::Resolved(summary),
            Wire::Other(_) => Self::None,
        })
    }
}

/// One user record as fetched from the backend.
///
/// Records are immutable once constructed. Only the fields the
/// aggregation engine consumes are modeled; unknown wire fields are
/// ignored on deserialization.
///
/// # Examples
///
/// ```
/// use referral_engine::core::user::{ReferrerRef, UserRecord};
/// use rust_decimal_macros::dec;
///
/// let user = UserRecord::new("u-1001")
///     .with_name("Amara")
///     .with_invested(dec!(2500))
///     .with_referrer(ReferrerRef::resolved("u-0042"));
///
/// assert_eq!(user.display_name(), "Amara");
/// assert_eq!(user.referred_by().resolved_id().unwrap().as_str(), "u-0042");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Backend-assigned identity, unique within a batch.
    id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    /// How this user reached the platform.
    #[serde(default, skip_serializing_if = "ReferrerRef::is_none")]
    referred_by: ReferrerRef,
    /// Capital the user has put in, already rounded by the backend.
    #[serde(default, with = "rust_decimal::serde::float")]
    total_invested: Decimal,
    /// Lifetime earnings credited to the user.
    #[serde(default, with = "rust_decimal::serde::float")]
    total_earned: Decimal,
    /// Signup time; display only.
    created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            referred_by: ReferrerRef::None,
            total_invested: Decimal::ZERO,
            total_earned: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_referrer(mut self, referred_by: ReferrerRef) -> Self {
        self.referred_by = referred_by;
        self
    }

    pub fn with_invested(mut self, amount: Decimal) -> Self {
        self.total_invested = amount;
        self
    }

    pub fn with_earned(mut self, amount: Decimal) -> Self {
        self.total_earned = amount;
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn referred_by(&self) -> &ReferrerRef {
        &self.referred_by
    }

    pub fn total_invested(&self) -> Decimal {
        self.total_invested
    }

    pub fn total_earned(&self) -> Decimal {
        self.total_earned
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when no resolvable referrer is attached to this user.
    pub fn is_organic(&self) -> bool {
        self.referred_by.resolved_id().is_none()
    }

    /// Name shown in team views: name, then email, then the raw id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_id_equality() {
        let a = UserId::new("u-1001");
        let b = UserId::new("u-1001");
        let c = UserId::new("u-1002");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let with_name = UserRecord::new("u-1").with_name("Amara").with_email("a@x.io");
        assert_eq!(with_name.display_name(), "Amara");

        let with_email = UserRecord::new("u-2").with_email("b@x.io");
        assert_eq!(with_email.display_name(), "b@x.io");

        let bare = UserRecord::new("u-3");
        assert_eq!(bare.display_name(), "u-3");
    }

    #[test]
    fn test_referrer_classification() {
        assert!(UserRecord::new("u-1").is_organic());
        assert!(UserRecord::new("u-2")
            .with_referrer(ReferrerRef::legacy("PROMO-2024"))
            .is_organic());
        assert!(!UserRecord::new("u-3")
            .with_referrer(ReferrerRef::resolved("u-1"))
            .is_organic());
    }

    #[test]
    fn test_referred_by_absent_and_null_parse_as_organic() {
        let absent: UserRecord = serde_json::from_str(
            r#"{"id":"u-1","createdAt":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(*absent.referred_by(), ReferrerRef::None);

        let null: UserRecord = serde_json::from_str(
            r#"{"id":"u-2","referredBy":null,"createdAt":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(*null.referred_by(), ReferrerRef::None);
    }

    #[test]
    fn test_referred_by_string_parses_as_legacy_code() {
        let user: UserRecord = serde_json::from_str(
            r#"{"id":"u-1","referredBy":"7f3a91c2","createdAt":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(
            *user.referred_by(),
            ReferrerRef::LegacyCode("7f3a91c2".to_string())
        );
        assert!(user.is_organic());
    }

    #[test]
    fn test_referred_by_object_parses_as_resolved() {
        let user: UserRecord = serde_json::from_str(
            r#"{
                "id": "u-9",
                "referredBy": { "id": "u-1", "name": "Amara", "referralCode": "7f3a91c2" },
                "totalInvested": 1250.5,
                "totalEarned": 90,
                "createdAt": "2024-03-01T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(user.referred_by().resolved_id().unwrap().as_str(), "u-1");
        assert_eq!(user.total_invested(), dec!(1250.5));
        assert_eq!(user.total_earned(), dec!(90));
    }

    #[test]
    fn test_referred_by_object_without_id_degrades_to_organic() {
        let user: UserRecord = serde_json::from_str(
            r#"{"id":"u-1","referredBy":{"name":"ghost"},"createdAt":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(*user.referred_by(), ReferrerRef::None);
    }

    #[test]
    fn test_unknown_wire_fields_are_ignored() {
        let user: UserRecord = serde_json::from_str(
            r#"{
                "id": "u-1",
                "status": "active",
                "walletBalance": 17.5,
                "createdAt": "2024-03-01T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(user.id().as_str(), "u-1");
        assert_eq!(user.total_invested(), Decimal::ZERO);
    }

    #[test]
    fn test_amounts_serialize_as_numbers() {
        let user = UserRecord::new("u-1").with_invested(dec!(1250.5));
        let json = serde_json::to_string(&user).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["totalInvested"].is_number());
        assert!(value.get("referredBy").is_none());
    }
}
