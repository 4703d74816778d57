//! Aggregate counts over a log list.

use crate::core::{HttpState, LogEntry, LogLevel};
use serde::Serialize;

/// Counts over the whole log list, computed in a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub total: usize,
    pub http: HttpStats,
    pub messages: MessageStats,
}

/// HTTP requests by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HttpStats {
    pub total: usize,
    /// 2xx
    pub success: usize,
    /// 3xx
    pub redirect: usize,
    /// 4xx
    pub client_error: usize,
    /// 5xx
    pub server_error: usize,
    /// Any other status code (1xx, non-standard).
    pub other: usize,
    /// Transport failures with no response.
    pub failed: usize,
    pub pending: usize,
}

/// Application messages by level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    pub total: usize,
    pub debug: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl LogStats {
    /// Scans `entries` once and returns the aggregate counts.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.total += 1;
            match entry {
                LogEntry::Http(http) => stats.http.record(&http.state),
                LogEntry::Message(message) => stats.messages.record(message.level),
            }
        }
        stats
    }

    /// Failed requests, 4xx/5xx responses and error messages.
    pub fn error_count(&self) -> usize {
        self.http.client_error + self.http.server_error + self.http.failed + self.messages.error
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl HttpStats {
    fn record(&mut self, state: &HttpState) {
        self.total += 1;
        match state {
            HttpState::Pending => self.pending += 1,
            HttpState::Failed { .. } => self.failed += 1,
            HttpState::Completed { status, .. } => match status {
                200..=299 => self.success += 1,
                300..=399 => self.redirect += 1,
                400..=499 => self.client_error += 1,
                500..=599 => self.server_error += 1,
                _ => self.other += 1,
            },
        }
    }
}

impl MessageStats {
    fn record(&mut self, level: LogLevel) {
        self.total += 1;
        match level {
            LogLevel::Debug => self.debug += 1,
            LogLevel::Info => self.info += 1,
            LogLevel::Warning => self.warning += 1,
            LogLevel::Error => self.error += 1,
        }
    }
}
