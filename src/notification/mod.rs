//! Builds and dispatches the stats notification.
//!
//! The `manager` owns the debounced render loop, `console` is a display
//! implementation that prints to stdout, and `tap` routes taps on the
//! notification back to the diagnostics viewer. The types below describe
//! what is handed to the host's `NotificationDisplay`.

pub mod console;
pub mod manager;
pub mod tap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How intrusive the notification channel is allowed to be.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Importance {
    Min,
    #[default]
    Low,
    Default,
    High,
}

/// The channel the stats notification is posted to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

/// A request to show (or update) the stats notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Stable id; repeated requests replace the visible notification.
    pub id: i32,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    /// Returned by the host on tap, see `tap::TapRouter`.
    pub payload: String,
    pub timestamp: DateTime<Utc>,
    /// Hint that the notification should not be swipe-dismissable.
    pub ongoing: bool,
    /// Hint that updates should not re-alert the user.
    pub only_alert_once: bool,
}
