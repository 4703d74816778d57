//! The notification manager is a stateful actor that debounces log list
//! emissions and keeps the stats notification up to date.

use crate::config::NotifierConfig;
use crate::core::{LogEntry, LogList, LogStream, NotificationDisplay};
use crate::formatting::TextFormatter;
use crate::internal_metrics::Metrics;
use crate::notification::NotificationRequest;
use crate::snapshot::NotificationSnapshot;
use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, instrument, warn};

/// The `NotificationManager` actor.
///
/// All state (pending list, last snapshot, timer) lives in the task running
/// [`NotificationManager::run`].
pub struct NotificationManager {
    config: NotifierConfig,
    display: Arc<dyn NotificationDisplay>,
    formatter: Box<dyn TextFormatter>,
    metrics: Metrics,
    last_snapshot: Option<NotificationSnapshot>,
}

impl NotificationManager {
    /// Creates a new `NotificationManager`.
    pub fn new(
        config: NotifierConfig,
        display: Arc<dyn NotificationDisplay>,
        formatter: Box<dyn TextFormatter>,
        metrics: Metrics,
    ) -> Self {
        Self {
            config,
            display,
            formatter,
            metrics,
            last_snapshot: None,
        }
    }

    /// Runs the manager's main loop until the stream ends or shutdown is
    /// signalled.
    ///
    /// On shutdown the pending list is discarded. When the stream ends the
    /// pending list is rendered first.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut stream: LogStream, mut shutdown_rx: watch::Receiver<bool>) {
        let debounce = self.config.debounce;
        let timer = sleep(debounce);
        tokio::pin!(timer);
        let mut pending: Option<LogList> = None;

        info!(debounce_ms = debounce.as_millis() as u64, "NotificationManager started.");
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    if let Some(dropped) = pending.take() {
                        debug!("Discarding pending list of {} entries on shutdown.", dropped.len());
                    }
                    info!("Shutdown signal received. Stopping NotificationManager.");
                    break;
                }
                _ = &mut timer, if pending.is_some() => {
                    if let Some(entries) = pending.take() {
                        debug!("Debounce timer expired, rendering {} entries.", entries.len());
                        self.render(&entries).await;
                    }
                }
                item = stream.next() => {
                    match item {
                        Some(Ok(entries)) => {
                            self.metrics.log_emissions_total.increment(1);
                            if debounce.is_zero() {
                                self.render(&entries).await;
                            } else {
                                pending = Some(entries);
                                timer.as_mut().reset(Instant::now() + debounce);
                            }
                        }
                        Some(Err(e)) => {
                            self.metrics.log_stream_errors_total.increment(1);
                            warn!(error = %e, "Log stream error, ignoring.");
                        }
                        None => {
                            info!("Log stream closed. Shutting down NotificationManager.");
                            if let Some(entries) = pending.take() {
                                debug!("Rendering final list of {} entries.", entries.len());
                                self.render(&entries).await;
                            }
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Renders `entries` unless the notification already shows the same thing.
    async fn render(&mut self, entries: &[LogEntry]) {
        if entries.is_empty() {
            self.clear().await;
            return;
        }

        let snapshot = NotificationSnapshot::capture(entries, Utc::now());
        if let Some(previous) = &self.last_snapshot {
            if !snapshot.differs_from(previous) {
                self.metrics.notifications_suppressed_total.increment(1);
                debug!("Snapshot unchanged, skipping notification update.");
                return;
            }
        }

        let request = self.build_request(&snapshot);
        match self.display.show(&request).await {
            Ok(()) => {
                self.metrics.notifications_shown_total.increment(1);
                debug!(
                    title = %request.title,
                    last_entry = ?snapshot.last_entry.map(|fingerprint| fingerprint.to_hex()),
                    "Notification updated."
                );
                self.last_snapshot = Some(snapshot);
            }
            Err(e) => {
                // The last snapshot is kept, so the next emission retries.
                self.metrics.notification_display_errors_total.increment(1);
                error!(error = %e, "Failed to show stats notification");
            }
        }
    }

    /// Removes the notification after the log list was emptied.
    async fn clear(&mut self) {
        if self.last_snapshot.take().is_none() {
            return;
        }
        match self.display.cancel(self.config.notification_id).await {
            Ok(()) => {
                self.metrics.notifications_cancelled_total.increment(1);
                debug!("Log list is empty, notification cancelled.");
            }
            Err(e) => {
                self.metrics.notification_display_errors_total.increment(1);
                error!(error = %e, "Failed to cancel stats notification");
            }
        }
    }

    fn build_request(&self, snapshot: &NotificationSnapshot) -> NotificationRequest {
        NotificationRequest {
            id: self.config.notification_id,
            channel_id: self.config.channel.id.clone(),
            title: self.formatter.format_title(&snapshot.stats),
            body: self.formatter.format_body(snapshot),
            payload: self.config.tap_payload.clone(),
            timestamp: snapshot.captured_at,
            ongoing: self.config.ongoing,
            only_alert_once: true,
        }
    }
}
