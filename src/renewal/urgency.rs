//! Days-to-expiration countdown and urgency tiers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::date_instant;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days until `expire_date`, rounding partial days up
///
/// `ceil((expire - now) / 1 day)` on millisecond resolution. Negative once
/// the expiration instant has passed (e.g. -1.5 days gives -1).
pub fn days_until_expiration(now: DateTime<Utc>, expire_date: NaiveDate) -> i64 {
    let diff_ms = (date_instant(expire_date) - now).num_milliseconds();
    let whole = diff_ms.div_euclid(MS_PER_DAY);
    if diff_ms.rem_euclid(MS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Severity of an upcoming expiration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Urgent,
    Upcoming,
    Normal,
}

impl UrgencyTier {
    /// Classify with the default thresholds (7 / 30 days)
    pub fn classify(days: i64) -> Self {
        UrgencyThresholds::default().classify(days)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Urgent => "urgent",
            UrgencyTier::Upcoming => "upcoming",
            UrgencyTier::Normal => "normal",
        }
    }

    /// Badge label shown next to a renewal
    pub fn badge(&self, days: i64) -> String {
        match self {
            UrgencyTier::Urgent => format!("Urgente - {}d", days),
            UrgencyTier::Upcoming => format!("Próximo - {}d", days),
            UrgencyTier::Normal => format!("{} días", days),
        }
    }
}

/// Upper day bounds of the urgent and upcoming tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyThresholds {
    #[serde(default = "default_urgent_days")]
    pub urgent_days: i64,
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: i64,
}

fn default_urgent_days() -> i64 { 7 }
fn default_upcoming_days() -> i64 { 30 }

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            urgent_days: default_urgent_days(),
            upcoming_days: default_upcoming_days(),
        }
    }
}

impl UrgencyThresholds {
    /// First matching tier wins, so already-expired (negative) counts are urgent
    pub fn classify(&self, days: i64) -> UrgencyTier {
        if days <= self.urgent_days {
            UrgencyTier::Urgent
        } else if days <= self.upcoming_days {
            UrgencyTier::Upcoming
        } else {
            UrgencyTier::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(UrgencyTier::classify(5), UrgencyTier::Urgent);
        assert_eq!(UrgencyTier::classify(7), UrgencyTier::Urgent);
        assert_eq!(UrgencyTier::classify(8), UrgencyTier::Upcoming);
        assert_eq!(UrgencyTier::classify(30), UrgencyTier::Upcoming);
        assert_eq!(UrgencyTier::classify(31), UrgencyTier::Normal);
    }

    #[test]
    fn test_expired_counts_as_urgent() {
        assert_eq!(UrgencyTier::classify(0), UrgencyTier::Urgent);
        assert_eq!(UrgencyTier::classify(-3), UrgencyTier::Urgent);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = UrgencyThresholds { urgent_days: 3, upcoming_days: 14 };
        assert_eq!(thresholds.classify(5), UrgencyTier::Upcoming);
        assert_eq!(thresholds.classify(15), UrgencyTier::Normal);
    }

    #[test]
    fn test_days_round_up() {
        let expire = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert_eq!(days_until_expiration(midnight, expire), 10);
        // Any fraction of a day left rounds toward more time, not less
        assert_eq!(days_until_expiration(midnight + Duration::hours(1), expire), 10);
        assert_eq!(days_until_expiration(midnight + Duration::hours(23), expire), 10);
        assert_eq!(days_until_expiration(midnight + Duration::days(1), expire), 9);
    }

    #[test]
    fn test_days_negative_after_expiration() {
        let expire = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        assert_eq!(days_until_expiration(now, expire), -1);
        assert_eq!(days_until_expiration(now + Duration::hours(12), expire), -2);
    }

    #[test]
    fn test_badges() {
        assert_eq!(UrgencyTier::Urgent.badge(3), "Urgente - 3d");
        assert_eq!(UrgencyTier::Upcoming.badge(12), "Próximo - 12d");
        assert_eq!(UrgencyTier::Normal.badge(45), "45 días");
    }
}
