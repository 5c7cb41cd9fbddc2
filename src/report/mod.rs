//! Report aggregation: counts by type, premium by month, totals
//!
//! All folds are single passes over an already owner-filtered collection.
//! Premiums are summed as `f64`; rounding error can accumulate over very
//! large books, which per-user datasets never approach.

mod aggregate;

pub use aggregate::{
    active_count, count_by_type, month_label, revenue_by_month, total_revenue, MonthRevenue,
    RevenueBucketing, TypeCount,
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::Policy;
use crate::renewal::{count_expiring, RenewalWindow};

/// Summary cards on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub active_policies: usize,
    pub expiring_policies: usize,
    pub total_revenue: f64,
}

impl DashboardStats {
    pub fn compute(
        now: DateTime<Utc>,
        window: RenewalWindow,
        total_clients: usize,
        policies: &[Policy],
    ) -> Self {
        Self {
            total_clients,
            active_policies: active_count(policies),
            expiring_policies: count_expiring(now, window, policies),
            total_revenue: total_revenue(policies),
        }
    }
}

/// Data behind the reports page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportData {
    pub total_clients: usize,
    pub active_policies: usize,
    pub total_revenue: f64,
    /// Shown under "Renovaciones"; the active count, there is no renewal history
    pub renewed_policies: usize,
    pub policies_by_type: Vec<TypeCount>,
    pub revenue_by_month: Vec<MonthRevenue>,
}

impl ReportData {
    pub fn compute(total_clients: usize, policies: &[Policy], bucketing: RevenueBucketing) -> Self {
        let active = active_count(policies);
        Self {
            total_clients,
            active_policies: active,
            total_revenue: total_revenue(policies),
            renewed_policies: active,
            policies_by_type: count_by_type(policies),
            revenue_by_month: revenue_by_month(policies, bucketing),
        }
    }
}
