// Snapshots of what the notification currently shows, and entry fingerprints.

use crate::core::{HttpState, LogEntry};
use crate::stats::LogStats;
use chrono::{DateTime, Utc};

/// Identity of a log entry in its current state.
///
/// An HTTP request that moves from pending to completed gets a new
/// fingerprint, so the notification is refreshed when the response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFingerprint(blake3::Hash);

impl EntryFingerprint {
    pub fn of(entry: &LogEntry) -> Self {
        Self(blake3::hash(Self::generate_key(entry).as_bytes()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    /// Generates the key material for an entry.
    fn generate_key(entry: &LogEntry) -> String {
        match entry {
            LogEntry::Http(http) => {
                let state = match &http.state {
                    HttpState::Pending => "PENDING".to_string(),
                    HttpState::Completed { status, .. } => format!("STATUS::{}", status),
                    HttpState::Failed { error } => format!("FAILED::{}", error),
                };
                format!(
                    "HTTP::{}::{}::{}::{}::{}",
                    http.id,
                    http.timestamp.timestamp_micros(),
                    http.method,
                    http.url,
                    state
                )
            }
            LogEntry::Message(message) => format!(
                "MESSAGE::{}::{}::{}",
                message.timestamp.timestamp_micros(),
                message.level,
                message.message
            ),
        }
    }
}

/// The rendered state of the notification.
#[derive(Debug, Clone)]
pub struct NotificationSnapshot {
    pub stats: LogStats,
    /// Fingerprint of the most recent entry, `None` for an empty list.
    pub last_entry: Option<EntryFingerprint>,
    /// Untruncated summary of the most recent entry.
    pub last_summary: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl NotificationSnapshot {
    /// Aggregates `entries` and records the identity of the last one.
    pub fn capture(entries: &[LogEntry], captured_at: DateTime<Utc>) -> Self {
        let last = entries.last();
        Self {
            stats: LogStats::from_entries(entries),
            last_entry: last.map(EntryFingerprint::of),
            last_summary: last.map(LogEntry::summary),
            captured_at,
        }
    }

    /// Whether rendering `self` would change what `previous` shows.
    ///
    /// Only the counts and the identity of the last entry are compared; the
    /// capture time is ignored.
    pub fn differs_from(&self, previous: &NotificationSnapshot) -> bool {
        self.stats != previous.stats || self.last_entry != previous.last_entry
    }
}
