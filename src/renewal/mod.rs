//! Renewal alerts: expiring-policy windows and urgency tiers
//!
//! Two windows are in use:
//! - the dashboard summary counts active policies expiring in the next 30 days
//! - the renewals listing shows active policies expiring in the next 60 days,
//!   soonest first, each tagged with an urgency tier

mod window;
mod urgency;

pub use window::{
    count_expiring, filter_expiring, sort_by_expiration, RenewalWindow, DASHBOARD_WINDOW_DAYS,
    MAX_WINDOW_DAYS, RENEWALS_WINDOW_DAYS,
};
pub use urgency::{days_until_expiration, UrgencyThresholds, UrgencyTier};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::PolicyWithClient;

/// A renewal listing row with its derived countdown and tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewalRow {
    #[serde(flatten)]
    pub policy: PolicyWithClient,
    pub days_until_expiration: i64,
    pub urgency: UrgencyTier,
}

impl RenewalRow {
    pub fn build(now: DateTime<Utc>, policy: PolicyWithClient, thresholds: &UrgencyThresholds) -> Self {
        let days = days_until_expiration(now, policy.expire_date);
        Self {
            urgency: thresholds.classify(days),
            days_until_expiration: days,
            policy,
        }
    }

    /// Localized badge text for the row's tier
    pub fn badge(&self) -> String {
        self.urgency.badge(self.days_until_expiration)
    }
}
