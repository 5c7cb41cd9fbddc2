//! Policy records as stored by the backend

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::{ClientContact, ClientId, UserId};

/// Unique policy identifier
pub type PolicyId = uuid::Uuid;

/// Stored status of a policy
///
/// Only `active` carries meaning for renewals and reports. Anything else the
/// backend holds is kept verbatim so it can be written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyStatus {
    /// Policy in force
    #[default]
    Active,
    /// Any other stored status (cancelled, lapsed, ...)
    Other(String),
}

impl PolicyStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, PolicyStatus::Active)
    }

    /// Get the string representation used by the backend
    pub fn as_str(&self) -> &str {
        match self {
            PolicyStatus::Active => "active",
            PolicyStatus::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for PolicyStatus {
    fn from(value: String) -> Self {
        if value == "active" {
            PolicyStatus::Active
        } else {
            PolicyStatus::Other(value)
        }
    }
}

impl From<&str> for PolicyStatus {
    fn from(value: &str) -> Self {
        PolicyStatus::from(value.to_string())
    }
}

impl From<PolicyStatus> for String {
    fn from(status: PolicyStatus) -> Self {
        match status {
            PolicyStatus::Active => "active".to_string(),
            PolicyStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Midnight UTC of a stored calendar date
///
/// Stored dates carry no time zone; the backend hands them out as
/// `yyyy-MM-dd`, which compares against "now" as 00:00 UTC of that day.
pub fn date_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// A single policy row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique policy identifier
    pub id: PolicyId,

    /// Owning client
    pub client_id: ClientId,

    /// Free-text policy number (unique per user by convention only)
    pub policy_number: String,

    /// Free-text category ("Auto", "Vida", "Hogar", ...)
    pub policy_type: String,

    /// Premium amount
    pub premium_amount: f64,

    pub start_date: NaiveDate,

    pub expire_date: NaiveDate,

    #[serde(default)]
    pub status: PolicyStatus,

    /// Authenticated user the row belongs to
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
}

impl Policy {
    /// Build a stored row from an insert payload
    pub fn from_new(id: PolicyId, new: NewPolicy) -> Self {
        Self {
            id,
            client_id: new.client_id,
            policy_number: new.policy_number,
            policy_type: new.policy_type,
            premium_amount: new.premium_amount,
            start_date: new.start_date,
            expire_date: new.expire_date,
            status: new.status,
            owner_id: new.owner_id,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Instant the policy expires (00:00 UTC of `expire_date`)
    pub fn expires_at(&self) -> DateTime<Utc> {
        date_instant(self.expire_date)
    }
}

/// Insert payload for a new policy
///
/// Same shape as [`Policy`] without the backend-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPolicy {
    pub client_id: ClientId,
    pub policy_number: String,
    pub policy_type: String,
    pub premium_amount: f64,
    pub start_date: NaiveDate,
    pub expire_date: NaiveDate,
    pub status: PolicyStatus,
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
}

/// Renewal listing row: an active policy joined with its client's contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyWithClient {
    pub id: PolicyId,
    pub policy_number: String,
    pub policy_type: String,
    pub expire_date: NaiveDate,
    pub premium_amount: f64,
    pub client: ClientContact,
}

impl PolicyWithClient {
    pub fn from_parts(policy: &Policy, client: ClientContact) -> Self {
        Self {
            id: policy.id,
            policy_number: policy.policy_number.clone(),
            policy_type: policy.policy_type.clone(),
            expire_date: policy.expire_date,
            premium_amount: policy.premium_amount,
            client,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        date_instant(self.expire_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_round_trip_through_strings() {
        assert_eq!(PolicyStatus::from("active"), PolicyStatus::Active);
        assert_eq!(
            PolicyStatus::from("cancelled"),
            PolicyStatus::Other("cancelled".to_string())
        );
        // Case-sensitive: only the exact backend value counts as active
        assert!(!PolicyStatus::from("Active").is_active());
        assert_eq!(String::from(PolicyStatus::Active), "active");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&PolicyStatus::Other("lapsed".into())).unwrap();
        assert_eq!(json, "\"lapsed\"");
        let parsed: PolicyStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, PolicyStatus::Active);
    }

    #[test]
    fn test_date_instant_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            date_instant(date),
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
        );
    }
}
