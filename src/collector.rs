//! An in-memory, bounded log collector.
//!
//! Stands in for the host's diagnostics collector: it keeps the most recent
//! entries and publishes the full list to subscribers after every change.

use crate::core::{
    HttpLogEntry, HttpState, LogCollector, LogEntry, LogLevel, LogList, LogStream,
    MessageLogEntry,
};
use chrono::Utc;
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::trace;

/// The id of an HTTP entry that did not come with one.
const UNASSIGNED_ID: u64 = 0;

/// Bounded log store backed by a `watch` channel.
///
/// Subscribers' streams end once the collector is dropped.
pub struct MemoryLogCollector {
    capacity: usize,
    next_id: AtomicU64,
    tx: watch::Sender<LogList>,
}

impl MemoryLogCollector {
    /// Creates a collector that keeps at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self {
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            tx,
        }
    }

    /// Appends an entry, evicting the oldest ones beyond capacity.
    ///
    /// An HTTP entry whose id is already present replaces that entry in place.
    /// Id 0 means unassigned: such an entry always gets a fresh id.
    pub fn record(&self, mut entry: LogEntry) {
        let capacity = self.capacity;
        if let LogEntry::Http(http) = &mut entry {
            if http.id == UNASSIGNED_ID {
                http.id = self.allocate_id();
            } else {
                // Keep generated ids clear of ids supplied by the caller.
                self.next_id
                    .fetch_max(http.id.saturating_add(1), Ordering::Relaxed);
            }
        }
        self.tx.send_modify(|list| {
            let entries = Arc::make_mut(list);
            if let LogEntry::Http(incoming) = &entry {
                let existing = entries.iter_mut().find(
                    |e| matches!(e, LogEntry::Http(current) if current.id == incoming.id),
                );
                if let Some(slot) = existing {
                    trace!(id = incoming.id, "Updating HTTP entry in place");
                    *slot = entry;
                    return;
                }
            }
            entries.push(entry);
            if entries.len() > capacity {
                let excess = entries.len() - capacity;
                entries.drain(..excess);
            }
        });
    }

    /// Records a new pending request and returns its id.
    pub fn start_request(&self, method: impl Into<String>, url: impl Into<String>) -> u64 {
        let id = self.allocate_id();
        self.record(LogEntry::Http(HttpLogEntry {
            id,
            timestamp: Utc::now(),
            method: method.into(),
            url: url.into(),
            state: HttpState::Pending,
        }));
        id
    }

    /// Marks a request as answered. Returns `false` if the id is unknown
    /// (never recorded, or already evicted).
    pub fn complete_request(&self, id: u64, status: u16, duration_ms: Option<u64>) -> bool {
        self.update_request(id, HttpState::Completed { status, duration_ms })
    }

    /// Marks a request as failed without a response. Returns `false` if the
    /// id is unknown.
    pub fn fail_request(&self, id: u64, error: impl Into<String>) -> bool {
        self.update_request(id, HttpState::Failed { error: error.into() })
    }

    /// Records an application message.
    pub fn log_message(&self, level: LogLevel, message: impl Into<String>) {
        self.record(LogEntry::Message(MessageLogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }));
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.tx.send_modify(|list| Arc::make_mut(list).clear());
    }

    /// The current list.
    pub fn entries(&self) -> LogList {
        self.tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands out the next request id. Saturates at `u64::MAX` instead of
    /// wrapping around into ids that may still be in the list.
    fn allocate_id(&self) -> u64 {
        let previous = self
            .next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                Some(id.saturating_add(1))
            });
        match previous {
            Ok(id) | Err(id) => id,
        }
    }

    fn update_request(&self, id: u64, state: HttpState) -> bool {
        self.tx.send_if_modified(|list| {
            let position = list
                .iter()
                .position(|e| matches!(e, LogEntry::Http(http) if http.id == id));
            match position {
                Some(index) => {
                    if let LogEntry::Http(http) = &mut Arc::make_mut(list)[index] {
                        http.state = state;
                    }
                    true
                }
                None => false,
            }
        })
    }
}

impl LogCollector for MemoryLogCollector {
    fn subscribe(&self) -> LogStream {
        WatchStream::new(self.tx.subscribe()).map(Ok).boxed()
    }
}
