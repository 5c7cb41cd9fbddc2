//! Forward-looking expiration windows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{Policy, PolicyWithClient};

/// Window used for the dashboard "expiring soon" count
pub const DASHBOARD_WINDOW_DAYS: u32 = 30;

/// Window used for the renewals listing
pub const RENEWALS_WINDOW_DAYS: u32 = 60;

/// Largest window a configuration may ask for (about a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// A window `[now, now + days]`, inclusive at both ends
///
/// Days are fixed 24-hour spans measured from `now`, not calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalWindow {
    pub days: u32,
}

impl RenewalWindow {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    pub fn dashboard() -> Self {
        Self::new(DASHBOARD_WINDOW_DAYS)
    }

    pub fn renewals() -> Self {
        Self::new(RENEWALS_WINDOW_DAYS)
    }

    /// Lower and upper bound of the window starting at `now`
    ///
    /// The upper bound saturates at the latest representable instant.
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = now
            .checked_add_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (now, to)
    }

    pub fn contains_instant(&self, now: DateTime<Utc>, instant: DateTime<Utc>) -> bool {
        let (from, to) = self.bounds(now);
        instant >= from && instant <= to
    }

    /// Active and expiring inside the window
    ///
    /// Status is taken as stored: a policy whose expiration already passed
    /// falls outside the window even if it still says active.
    pub fn contains(&self, now: DateTime<Utc>, policy: &Policy) -> bool {
        policy.is_active() && self.contains_instant(now, policy.expires_at())
    }
}

/// Policies inside the window, in input order
pub fn filter_expiring<'a>(
    now: DateTime<Utc>,
    window: RenewalWindow,
    policies: &'a [Policy],
) -> Vec<&'a Policy> {
    policies.iter().filter(|p| window.contains(now, p)).collect()
}

/// Number of policies inside the window
pub fn count_expiring(now: DateTime<Utc>, window: RenewalWindow, policies: &[Policy]) -> usize {
    policies.iter().filter(|p| window.contains(now, p)).count()
}

/// Sort renewal rows soonest-expiring first (stable for equal dates)
pub fn sort_by_expiration(rows: &mut [PolicyWithClient]) {
    rows.sort_by_key(|r| r.expire_date);
}
