//! Tests for the process-wide notifier.

#[path = "../helpers/mod.rs"]
mod helpers;

use anyhow::Result;
use diagnotify::{
    collector::MemoryLogCollector,
    core::{LogCollector, LogLevel},
    global,
    service::StatsNotifier,
    NotifierError, TapOutcome,
};
use helpers::{mock_display::RecordingDisplay, mock_navigator::CountingNavigator, notifier_config};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use tracing_test::traced_test;

#[tokio::test]
#[serial]
#[traced_test]
async fn test_operations_before_initialize_fail() {
    global::dispose().await;
    assert!(!global::is_initialized().await);

    let collector = MemoryLogCollector::new(10);
    assert!(matches!(
        global::start(collector.subscribe()).await,
        Err(NotifierError::NotInitialized)
    ));
    assert!(matches!(global::stop().await, Err(NotifierError::NotInitialized)));
    assert!(matches!(global::finish().await, Err(NotifierError::NotInitialized)));
    assert!(matches!(
        global::handle_tap(Some("diagnotify://open")).await,
        Err(NotifierError::NotInitialized)
    ));
    assert!(logs_contain("Stats notifier used before initialize()."));
}

#[tokio::test]
#[serial]
async fn test_double_initialize_is_rejected() -> Result<()> {
    global::dispose().await;
    let display = RecordingDisplay::new();

    global::initialize(
        StatsNotifier::builder(notifier_config(Duration::ZERO)).display(Arc::new(display.clone())),
    )
    .await?;
    let second = global::initialize(
        StatsNotifier::builder(notifier_config(Duration::ZERO)).display(Arc::new(display)),
    )
    .await;
    assert!(matches!(second, Err(NotifierError::AlreadyInitialized)));
    assert!(global::is_initialized().await);

    global::dispose().await;
    assert!(!global::is_initialized().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_failed_build_leaves_singleton_empty() {
    global::dispose().await;

    let result = global::initialize(StatsNotifier::builder(notifier_config(Duration::ZERO))).await;
    assert!(matches!(result, Err(NotifierError::MissingDisplay)));
    assert!(!global::is_initialized().await);
}

#[tokio::test]
#[serial]
async fn test_global_notifier_lifecycle() -> Result<()> {
    global::dispose().await;
    let display = RecordingDisplay::new();
    let navigator = CountingNavigator::new();
    global::initialize(
        StatsNotifier::builder(notifier_config(Duration::from_millis(20)))
            .display(Arc::new(display.clone()))
            .navigator(Arc::new(navigator.clone())),
    )
    .await?;

    let collector = MemoryLogCollector::new(10);
    global::start(collector.subscribe()).await?;
    assert!(global::is_running().await?);

    collector.log_message(LogLevel::Error, "disk full");
    display.wait_for_shown(1, Duration::from_secs(5)).await;
    assert_eq!(display.shown()[0].title, "Diagnostics · 0 requests · 1 error");

    assert_eq!(global::handle_tap(Some("diagnotify://open")).await?, TapOutcome::Opened);
    assert_eq!(global::handle_tap(None).await?, TapOutcome::Ignored);
    assert_eq!(navigator.opened(), 1);

    global::stop().await?;
    assert!(!global::is_running().await?);
    assert_eq!(display.cancelled(), vec![4242]);

    global::dispose().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_pending_finish_does_not_block_other_operations() -> Result<()> {
    global::dispose().await;
    let display = RecordingDisplay::new();
    global::initialize(
        StatsNotifier::builder(notifier_config(Duration::ZERO)).display(Arc::new(display.clone())),
    )
    .await?;

    // The collector stays alive, so the stream never ends on its own.
    let collector = MemoryLogCollector::new(10);
    global::start(collector.subscribe()).await?;
    let finishing = tokio::spawn(global::finish());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!finishing.is_finished());

    let tap = tokio::time::timeout(Duration::from_secs(2), global::handle_tap(None)).await;
    assert_eq!(tap.expect("handle_tap blocked behind finish")?, TapOutcome::Ignored);

    tokio::time::timeout(Duration::from_secs(2), global::stop())
        .await
        .expect("stop blocked behind finish")?;
    tokio::time::timeout(Duration::from_secs(2), finishing)
        .await
        .expect("finish did not return after stop")??;

    assert!(!global::is_running().await?);
    global::dispose().await;
    Ok(())
}
