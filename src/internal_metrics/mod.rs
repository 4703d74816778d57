//! # Internal Metrics Module
//!
//! Counters for the notifier, recorded through the `metrics` facade. No
//! exporter is installed by the library; the host may install any `metrics`
//! recorder to collect them. Without one, every call is a no-op.

use metrics::{Counter, Unit};

/// Cloneable handles to the notifier's counters.
#[derive(Clone)]
pub struct Metrics {
    pub log_emissions_total: Counter,
    pub log_stream_errors_total: Counter,
    pub notifications_shown_total: Counter,
    pub notifications_suppressed_total: Counter,
    pub notifications_cancelled_total: Counter,
    pub notification_display_errors_total: Counter,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Registers descriptions with the global recorder and returns handles.
    pub fn new() -> Self {
        metrics::describe_counter!("log_emissions_total", Unit::Count, "Total number of log lists received from the collector stream.");
        metrics::describe_counter!("log_stream_errors_total", Unit::Count, "Total number of errors received on the collector stream.");
        metrics::describe_counter!("notifications_shown_total", Unit::Count, "Total number of times the stats notification was shown or updated.");
        metrics::describe_counter!("notifications_suppressed_total", Unit::Count, "Total number of renders skipped because the snapshot was unchanged.");
        metrics::describe_counter!("notifications_cancelled_total", Unit::Count, "Total number of times the stats notification was removed.");
        metrics::describe_counter!("notification_display_errors_total", Unit::Count, "Total number of failed calls to the notification display.");

        Self {
            log_emissions_total: metrics::counter!("log_emissions_total"),
            log_stream_errors_total: metrics::counter!("log_stream_errors_total"),
            notifications_shown_total: metrics::counter!("notifications_shown_total"),
            notifications_suppressed_total: metrics::counter!("notifications_suppressed_total"),
            notifications_cancelled_total: metrics::counter!("notifications_cancelled_total"),
            notification_display_errors_total: metrics::counter!("notification_display_errors_total"),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
