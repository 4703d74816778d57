/// Diagnotify - a live notification for in-app diagnostics
///
/// This library keeps a single, debounced notification in sync with a stream
/// of HTTP request and log message entries, and routes taps on it back to the
/// host's diagnostics viewer.
pub mod cli;
pub mod collector;
pub mod config;
pub mod core;
pub mod error;
pub mod formatting;
pub mod global;
pub mod internal_metrics;
pub mod notification;
pub mod service;
pub mod snapshot;
pub mod stats;

// Re-export core types for convenience
pub use crate::core::*;
pub use crate::collector::MemoryLogCollector;
pub use crate::error::{CollectorError, NotifierError};
pub use crate::notification::tap::TapOutcome;
pub use crate::service::{StatsNotifier, StatsNotifierBuilder};
