//! Core domain types and service traits for diagnotify
//!
//! This module defines the log entries produced by the diagnostics collector
//! and the trait contracts the host application implements: the notification
//! display facility, the diagnostics navigator, and the log collector.

use crate::error::CollectorError;
use crate::notification::{NotificationChannel, NotificationRequest};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The full current list of log entries, as emitted by a collector.
pub type LogList = Arc<Vec<LogEntry>>;

/// A push stream of full log lists. Each item replaces the previous one.
pub type LogStream = BoxStream<'static, Result<LogList, CollectorError>>;

/// One recorded diagnostics event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// An HTTP request issued by the host application.
    Http(HttpLogEntry),
    /// A free-form application log message.
    Message(MessageLogEntry),
}

impl LogEntry {
    /// When the event was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::Http(http) => http.timestamp,
            LogEntry::Message(message) => message.timestamp,
        }
    }

    /// A single-line, human readable description of the entry.
    ///
    /// Whitespace runs (including newlines in messages) collapse to a single
    /// space. The result is not truncated.
    pub fn summary(&self) -> String {
        match self {
            LogEntry::Http(http) => {
                let outcome = match &http.state {
                    HttpState::Pending => "pending".to_string(),
                    HttpState::Completed {
                        status,
                        duration_ms: Some(ms),
                    } => format!("{} ({} ms)", status, ms),
                    HttpState::Completed { status, .. } => status.to_string(),
                    HttpState::Failed { error } => format!("failed: {}", collapse(error)),
                };
                format!("{} {} → {}", http.method, http.url, outcome)
            }
            LogEntry::Message(message) => {
                format!("[{}] {}", message.level, collapse(&message.message))
            }
        }
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// An HTTP request and its current state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpLogEntry {
    /// Stable per request so the entry can be updated in place as it completes.
    /// 0 (the default when missing) means unassigned; collectors allocate one.
    #[serde(default)]
    pub id: u64,
    #[serde(default = "chrono::Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub state: HttpState,
}

/// Lifecycle of an HTTP request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HttpState {
    /// Sent, no response yet.
    #[default]
    Pending,
    /// A response arrived.
    Completed {
        status: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    /// The request failed before a response (DNS, TLS, timeout, ...).
    Failed { error: String },
}

/// An application message and its severity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageLogEntry {
    #[serde(default = "chrono::Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Severity of an application message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// The host's local notification facility.
///
/// Implementations wrap the platform notification API. All calls for the
/// stats notification use the same id, so `show` updates rather than
/// duplicates.
#[async_trait]
pub trait NotificationDisplay: Send + Sync {
    /// Registers the channel the stats notification is posted to.
    async fn create_channel(&self, channel: &NotificationChannel) -> Result<()>;

    /// Asks the user for permission to post notifications.
    ///
    /// # Returns
    /// * `Ok(true)` if notifications may be shown
    /// * `Ok(false)` if the user declined
    async fn request_permission(&self) -> Result<bool> {
        Ok(true)
    }

    /// Shows the notification, or updates it if one with the same id is visible.
    async fn show(&self, request: &NotificationRequest) -> Result<()>;

    /// Removes the notification with the given id.
    async fn cancel(&self, id: i32) -> Result<()>;
}

/// Opens the host application's diagnostics viewer.
pub trait DiagnosticsNavigator: Send + Sync {
    fn open_diagnostics(&self) -> Result<()>;
}

impl<F> DiagnosticsNavigator for F
where
    F: Fn() -> Result<()> + Send + Sync,
{
    fn open_diagnostics(&self) -> Result<()> {
        self()
    }
}

/// A source of log lists.
pub trait LogCollector: Send + Sync {
    /// Subscribes to the collector. The stream yields the current list first,
    /// then the full list again after every change.
    fn subscribe(&self) -> LogStream;
}
