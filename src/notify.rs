//! User-visible notifications (toasts)

use log::{error, info};
use serde::Serialize;

/// Sink for success/error messages shown to the user
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Prints notifications to stderr and mirrors them to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&mut self, message: &str) {
        info!("notify success: {}", message);
        eprintln!("✓ {}", message);
    }

    fn error(&mut self, message: &str) {
        error!("notify error: {}", message);
        eprintln!("✗ {}", message);
    }
}

/// Keeps every notification for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| matches!(n, Notification::Error(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&mut self, message: &str) {
        self.notifications.push(Notification::Success(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.notifications.push(Notification::Error(message.to_string()));
    }
}
