//! Tracker configuration
//!
//! Loaded from an optional JSON file; every field has a default so a partial
//! file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::renewal::{
    RenewalWindow, UrgencyThresholds, DASHBOARD_WINDOW_DAYS, MAX_WINDOW_DAYS, RENEWALS_WINDOW_DAYS,
};
use crate::report::RevenueBucketing;

/// Default path to the CSV backend directory
pub const DEFAULT_DATA_PATH: &str = "data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Directory holding the CSV backend files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Dashboard "expiring soon" window (default: 30 days)
    #[serde(default = "default_dashboard_days")]
    pub dashboard_window_days: u32,

    /// Renewals listing window (default: 60 days)
    #[serde(default = "default_renewals_days")]
    pub renewals_window_days: u32,

    #[serde(default)]
    pub urgency: UrgencyThresholds,

    #[serde(default)]
    pub revenue_bucketing: RevenueBucketing,
}

fn default_data_dir() -> PathBuf { PathBuf::from(DEFAULT_DATA_PATH) }
fn default_dashboard_days() -> u32 { DASHBOARD_WINDOW_DAYS }
fn default_renewals_days() -> u32 { RENEWALS_WINDOW_DAYS }

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            dashboard_window_days: default_dashboard_days(),
            renewals_window_days: default_renewals_days(),
            urgency: UrgencyThresholds::default(),
            revenue_bucketing: RevenueBucketing::default(),
        }
    }
}

impl TrackerConfig {
    /// Load and validate a JSON config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, days) in [
            ("dashboard_window_days", self.dashboard_window_days),
            ("renewals_window_days", self.renewals_window_days),
        ] {
            if days == 0 || days > MAX_WINDOW_DAYS {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be between 1 and {} (got {})", MAX_WINDOW_DAYS, days),
                });
            }
        }
        if self.urgency.urgent_days > self.urgency.upcoming_days {
            return Err(ConfigError::Invalid {
                field: "urgency",
                message: format!(
                    "urgent_days ({}) exceeds upcoming_days ({})",
                    self.urgency.urgent_days, self.urgency.upcoming_days
                ),
            });
        }
        Ok(())
    }

    pub fn dashboard_window(&self) -> RenewalWindow {
        RenewalWindow::new(self.dashboard_window_days)
    }

    pub fn renewals_window(&self) -> RenewalWindow {
        RenewalWindow::new(self.renewals_window_days)
    }
}
