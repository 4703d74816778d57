//! Error types for the notifier service and log collectors.

use thiserror::Error;

/// Errors surfaced by the notifier service and the process-wide singleton.
#[derive(Error, Debug)]
pub enum NotifierError {
    /// An operation was called before `global::initialize`.
    #[error("stats notifier has not been initialized")]
    NotInitialized,

    /// `global::initialize` was called twice without `global::dispose`.
    #[error("stats notifier is already initialized")]
    AlreadyInitialized,

    /// The builder was finished without a notification display.
    #[error("a notification display is required to build the notifier")]
    MissingDisplay,

    #[error("invalid notifier configuration: {0}")]
    InvalidConfig(String),

    /// The host notification facility rejected a call.
    #[error("notification display failed")]
    Display(#[source] anyhow::Error),

    /// The host navigator failed to open the diagnostics viewer.
    #[error("failed to open diagnostics viewer")]
    Navigation(#[source] anyhow::Error),
}

/// Errors carried on a log stream. The notifier logs and skips them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectorError {
    /// The upstream collector reported a failure.
    #[error("log collector error: {0}")]
    Source(String),
}
