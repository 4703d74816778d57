//! Process-wide access to a single [`StatsNotifier`].
//!
//! Hosts that cannot thread a notifier through their code initialize it once
//! and drive it through these functions. Every operation fails with
//! [`NotifierError::NotInitialized`] until [`initialize`] succeeded.

use crate::core::LogStream;
use crate::error::NotifierError;
use crate::notification::tap::TapOutcome;
use crate::service::{StatsNotifier, StatsNotifierBuilder};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{error, info};

static NOTIFIER: Lazy<Mutex<Option<StatsNotifier>>> = Lazy::new(|| Mutex::new(None));

fn not_initialized(operation: &str) -> NotifierError {
    error!(operation, "Stats notifier used before initialize().");
    NotifierError::NotInitialized
}

/// Builds the notifier and installs it as the process-wide instance.
pub async fn initialize(builder: StatsNotifierBuilder) -> Result<(), NotifierError> {
    let mut slot = NOTIFIER.lock().await;
    if slot.is_some() {
        error!("Stats notifier is already initialized.");
        return Err(NotifierError::AlreadyInitialized);
    }
    *slot = Some(builder.build().await?);
    info!("Stats notifier initialized.");
    Ok(())
}

pub async fn is_initialized() -> bool {
    NOTIFIER.lock().await.is_some()
}

/// See [`StatsNotifier::start`].
pub async fn start(stream: LogStream) -> Result<(), NotifierError> {
    let mut slot = NOTIFIER.lock().await;
    let notifier = slot.as_mut().ok_or_else(|| not_initialized("start"))?;
    notifier.start(stream).await;
    Ok(())
}

/// See [`StatsNotifier::stop`].
pub async fn stop() -> Result<(), NotifierError> {
    let mut slot = NOTIFIER.lock().await;
    let notifier = slot.as_mut().ok_or_else(|| not_initialized("stop"))?;
    notifier.stop().await;
    Ok(())
}

/// See [`StatsNotifier::finish`].
///
/// The lock is released while waiting, so `stop`, `handle_tap` and `dispose`
/// stay usable until the stream ends.
pub async fn finish() -> Result<(), NotifierError> {
    let completion = {
        let slot = NOTIFIER.lock().await;
        let notifier = slot.as_ref().ok_or_else(|| not_initialized("finish"))?;
        notifier.completion()
    };
    if let Some(mut done) = completion {
        // An error means the task is gone as well.
        let _ = done.wait_for(|finished| *finished).await;
    }

    let mut slot = NOTIFIER.lock().await;
    if let Some(notifier) = slot.as_mut() {
        // A subscription started in the meantime is left running.
        let finished = notifier
            .completion()
            .map_or(true, |done| *done.borrow());
        if finished {
            notifier.finish().await;
        }
    }
    Ok(())
}

/// See [`StatsNotifier::is_running`].
pub async fn is_running() -> Result<bool, NotifierError> {
    let slot = NOTIFIER.lock().await;
    let notifier = slot.as_ref().ok_or_else(|| not_initialized("is_running"))?;
    Ok(notifier.is_running())
}

/// See [`StatsNotifier::handle_tap`].
pub async fn handle_tap(payload: Option<&str>) -> Result<TapOutcome, NotifierError> {
    let slot = NOTIFIER.lock().await;
    let notifier = slot.as_ref().ok_or_else(|| not_initialized("handle_tap"))?;
    notifier.handle_tap(payload)
}

/// Stops the notifier and removes it, so [`initialize`] may be called again.
pub async fn dispose() {
    let notifier = NOTIFIER.lock().await.take();
    if let Some(mut notifier) = notifier {
        notifier.stop().await;
        info!("Stats notifier disposed.");
    }
}
