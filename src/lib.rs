//! Policy Tracker - client and insurance policy tracking for independent agents
//!
//! This library provides:
//! - Client and policy records scoped per authenticated user
//! - Renewal alerts (expiring-policy windows, urgency tiers)
//! - Report aggregation (counts by type, premium by month, totals)
//! - Validated policy creation against a pluggable backend

pub mod client;
pub mod policy;
pub mod renewal;
pub mod report;
pub mod store;
pub mod session;
pub mod notify;
pub mod create;
pub mod config;
pub mod error;
pub mod desk;

// Re-export commonly used types
pub use client::{Client, UserId};
pub use policy::{Policy, PolicyStatus, PolicyWithClient, NewPolicy};
pub use renewal::{RenewalRow, RenewalWindow, UrgencyTier};
pub use report::{DashboardStats, ReportData};
pub use store::{CsvStore, MemoryStore};
pub use session::{Session, StaticAuth};
pub use create::PolicyForm;
pub use config::TrackerConfig;
pub use error::{DeskError, StoreError};
pub use desk::PolicyDesk;
