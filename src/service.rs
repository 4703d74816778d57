//! The stats notifier service: initialization, subscription lifecycle and
//! tap handling.

use crate::config::NotifierConfig;
use crate::core::{DiagnosticsNavigator, LogStream, NotificationDisplay};
use crate::error::NotifierError;
use crate::formatting::{SummaryFormatter, TextFormatter};
use crate::internal_metrics::Metrics;
use crate::notification::manager::NotificationManager;
use crate::notification::tap::{TapOutcome, TapRouter};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// A running subscription to a log stream.
struct Subscription {
    shutdown_tx: watch::Sender<bool>,
    /// Flips to `true` once the manager task has returned.
    done_rx: watch::Receiver<bool>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Waits for the manager task, logging a panic instead of propagating it.
    async fn join(self) {
        if let Err(e) = self.handle.await {
            error!("NotificationManager task panicked: {:?}", e);
        }
    }
}

/// Keeps a debounced stats notification in sync with a log stream.
///
/// At most one subscription runs at a time.
pub struct StatsNotifier {
    config: NotifierConfig,
    display: Arc<dyn NotificationDisplay>,
    tap_router: TapRouter,
    metrics: Metrics,
    subscription: Option<Subscription>,
}

impl StatsNotifier {
    /// Creates a new `StatsNotifierBuilder` to construct a `StatsNotifier`.
    pub fn builder(config: NotifierConfig) -> StatsNotifierBuilder {
        StatsNotifierBuilder::new(config)
    }

    /// Subscribes to `stream`, replacing any running subscription.
    #[instrument(skip_all)]
    pub async fn start(&mut self, stream: LogStream) {
        if self.subscription.is_some() {
            debug!("Replacing running subscription.");
            self.stop_subscription().await;
        }

        let formatter: Box<dyn TextFormatter> = Box::new(SummaryFormatter::new(
            self.config.title.clone(),
            self.config.max_line_length,
        ));
        let manager = NotificationManager::new(
            self.config.clone(),
            self.display.clone(),
            formatter,
            self.metrics.clone(),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            manager.run(stream, shutdown_rx).await;
            let _ = done_tx.send(true);
        });
        self.subscription = Some(Subscription {
            shutdown_tx,
            done_rx,
            handle,
        });
        info!("Stats notifier started.");
    }

    /// Stops the subscription and discards pending updates.
    ///
    /// A display call already in progress completes; nothing new is
    /// scheduled. With `clear_on_stop` the notification is removed afterwards.
    #[instrument(skip_all)]
    pub async fn stop(&mut self) {
        if self.subscription.is_none() {
            debug!("Stop requested, but the notifier is not running.");
            return;
        }
        self.stop_subscription().await;

        if self.config.clear_on_stop {
            if let Err(e) = self.display.cancel(self.config.notification_id).await {
                error!(error = %e, "Failed to cancel stats notification on stop");
            } else {
                self.metrics.notifications_cancelled_total.increment(1);
            }
        }
        info!("Stats notifier stopped.");
    }

    /// Waits for a subscription whose stream has ended to render its final
    /// update and exit. Returns immediately if nothing is running.
    pub async fn finish(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!("Waiting for the log stream to drain.");
            subscription.join().await;
        }
    }

    /// A receiver that turns `true` when the current subscription's task
    /// exits, so callers can wait for it without borrowing the notifier.
    /// The sender is dropped if the task panics.
    pub(crate) fn completion(&self) -> Option<watch::Receiver<bool>> {
        self.subscription
            .as_ref()
            .map(|subscription| subscription.done_rx.clone())
    }

    /// Whether a subscription is active. A subscription whose stream has
    /// ended counts as stopped.
    pub fn is_running(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|subscription| !subscription.handle.is_finished())
    }

    /// Routes a notification tap; see [`TapRouter::handle`].
    pub fn handle_tap(&self, payload: Option<&str>) -> Result<TapOutcome, NotifierError> {
        self.tap_router.handle(payload)
    }

    async fn stop_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            // The task may already have exited if its stream ended.
            let _ = subscription.shutdown_tx.send(true);
            subscription.join().await;
        }
    }
}

/// Builder for the stats notifier.
///
/// Building creates the notification channel and asks for permission, so it
/// talks to the display once before any log is rendered.
pub struct StatsNotifierBuilder {
    config: NotifierConfig,
    display: Option<Arc<dyn NotificationDisplay>>,
    navigator: Option<Arc<dyn DiagnosticsNavigator>>,
    metrics: Option<Metrics>,
}

impl StatsNotifierBuilder {
    /// Creates a new `StatsNotifierBuilder` with the given configuration.
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            config,
            display: None,
            navigator: None,
            metrics: None,
        }
    }

    /// Sets the host notification facility. Required.
    pub fn display(mut self, display: Arc<dyn NotificationDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    /// Sets the callback that opens the diagnostics viewer on tap.
    pub fn navigator(mut self, navigator: Arc<dyn DiagnosticsNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Overrides the metrics handles.
    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validates the configuration, creates the notification channel and
    /// requests permission.
    #[instrument(skip_all)]
    pub async fn build(self) -> Result<StatsNotifier, NotifierError> {
        let display = self.display.ok_or(NotifierError::MissingDisplay)?;
        self.config
            .validate()
            .map_err(|e| NotifierError::InvalidConfig(e.to_string()))?;

        let channel = self.config.notification_channel();
        display
            .create_channel(&channel)
            .await
            .map_err(NotifierError::Display)?;
        debug!(channel_id = %channel.id, "Notification channel ready.");

        match display.request_permission().await {
            Ok(true) => debug!("Notification permission granted."),
            Ok(false) => warn!("Notification permission denied. The stats notification will not be visible."),
            Err(e) => warn!(error = %e, "Failed to request notification permission."),
        }

        let tap_router = TapRouter::new(self.config.tap_payload.clone(), self.navigator);
        Ok(StatsNotifier {
            config: self.config,
            display,
            tap_router,
            metrics: self.metrics.unwrap_or_default(),
            subscription: None,
        })
    }
}
