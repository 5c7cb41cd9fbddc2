//! Folds over a policy collection

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::policy::Policy;

/// Short es-ES month names, January first
const MONTH_LABELS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Pie chart slice: number of policies with one exact type string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub name: String,
    pub value: usize,
}

/// Bar chart bar: premium summed over one month bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRevenue {
    pub month: String,
    pub revenue: f64,
}

/// How start dates are bucketed for revenue by month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueBucketing {
    /// Month name only; the same month of different years shares a bucket
    #[default]
    MonthLabel,
    /// Month name and year ("mar 2024")
    YearMonth,
}

impl RevenueBucketing {
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            RevenueBucketing::MonthLabel => month_label(date).to_string(),
            RevenueBucketing::YearMonth => format!("{} {}", month_label(date), date.year()),
        }
    }
}

/// Short es-ES month name of a date
pub fn month_label(date: NaiveDate) -> &'static str {
    MONTH_LABELS[date.month0() as usize]
}

/// Count policies per `policy_type`, buckets in first-seen order
///
/// Type strings are compared exactly: "Auto" and "auto" are two buckets.
pub fn count_by_type(policies: &[Policy]) -> Vec<TypeCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TypeCount> = Vec::new();

    for policy in policies {
        match index.get(policy.policy_type.as_str()) {
            Some(&i) => counts[i].value += 1,
            None => {
                index.insert(policy.policy_type.as_str(), counts.len());
                counts.push(TypeCount {
                    name: policy.policy_type.clone(),
                    value: 1,
                });
            }
        }
    }

    counts
}

/// Sum premiums per start-date month bucket, buckets in first-seen order
pub fn revenue_by_month(policies: &[Policy], bucketing: RevenueBucketing) -> Vec<MonthRevenue> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut months: Vec<MonthRevenue> = Vec::new();

    for policy in policies {
        let key = bucketing.key(policy.start_date);
        match index.get(&key) {
            Some(&i) => months[i].revenue += policy.premium_amount,
            None => {
                index.insert(key.clone(), months.len());
                months.push(MonthRevenue {
                    month: key,
                    revenue: policy.premium_amount,
                });
            }
        }
    }

    months
}

/// Sum of all premiums, whatever the status
pub fn total_revenue(policies: &[Policy]) -> f64 {
    policies.iter().map(|p| p.premium_amount).sum()
}

pub fn active_count(policies: &[Policy]) -> usize {
    policies.iter().filter(|p| p.is_active()).count()
}
