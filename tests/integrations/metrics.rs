//! Counters recorded by the notifier.

#[path = "../helpers/mod.rs"]
mod helpers;

use anyhow::Result;
use diagnotify::{
    core::{LogEntry, LogLevel, LogList, MessageLogEntry},
    internal_metrics::Metrics,
    service::StatsNotifier,
    CollectorError,
};
use futures::StreamExt;
use helpers::{mock_display::RecordingDisplay, notifier_config, test_metrics::TestRecorder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

fn warnings(count: usize) -> LogList {
    Arc::new(
        (0..count)
            .map(|i| {
                LogEntry::Message(MessageLogEntry {
                    timestamp: chrono::DateTime::from_timestamp(1_760_000_000 + i as i64, 0).unwrap(),
                    level: LogLevel::Warning,
                    message: format!("warning {}", i),
                })
            })
            .collect(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_render_outcomes_are_counted() -> Result<()> {
    let recorder = TestRecorder::new();
    let metrics = metrics::with_local_recorder(&recorder, Metrics::new);
    let display = RecordingDisplay::new();
    let mut notifier = StatsNotifier::builder(notifier_config(Duration::from_millis(100)))
        .display(Arc::new(display.clone()))
        .metrics(metrics)
        .build()
        .await?;

    let (tx, rx) = mpsc::unbounded_channel::<Result<LogList, CollectorError>>();
    notifier.start(UnboundedReceiverStream::new(rx).boxed()).await;

    // A burst of three renders once.
    for n in 1..=3 {
        tx.send(Ok(warnings(n)))?;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    // The same list again is suppressed.
    tx.send(Ok(warnings(3)))?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    tx.send(Err(CollectorError::Source("restarted".into())))?;
    // Clearing the list removes the notification.
    tx.send(Ok(warnings(0)))?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(recorder.counter("log_emissions_total"), 5);
    assert_eq!(recorder.counter("log_stream_errors_total"), 1);
    assert_eq!(recorder.counter("notifications_shown_total"), 1);
    assert_eq!(recorder.counter("notifications_suppressed_total"), 1);
    assert_eq!(recorder.counter("notifications_cancelled_total"), 1);
    assert_eq!(recorder.counter("notification_display_errors_total"), 0);
    assert_eq!(display.shown().len(), 1);
    assert_eq!(display.cancelled(), vec![4242]);

    // clear_on_stop removes it once more.
    notifier.stop().await;
    assert_eq!(recorder.counter("notifications_cancelled_total"), 2);
    Ok(())
}
