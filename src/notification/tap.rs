//! Routes taps on the stats notification to the diagnostics viewer.

use crate::core::DiagnosticsNavigator;
use crate::error::NotifierError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a tap handed to [`TapRouter::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The diagnostics viewer was opened.
    Opened,
    /// The tap was not for the stats notification, or no navigator is set.
    Ignored,
}

/// Matches tap payloads against the stats notification's payload.
#[derive(Clone)]
pub struct TapRouter {
    payload: String,
    navigator: Option<Arc<dyn DiagnosticsNavigator>>,
}

impl TapRouter {
    pub fn new(payload: impl Into<String>, navigator: Option<Arc<dyn DiagnosticsNavigator>>) -> Self {
        Self {
            payload: payload.into(),
            navigator,
        }
    }

    /// Handles a tap with the payload the platform returned.
    ///
    /// Taps on other notifications of the host (a different or missing
    /// payload) are ignored so the host can route them itself.
    pub fn handle(&self, payload: Option<&str>) -> Result<TapOutcome, NotifierError> {
        if payload != Some(self.payload.as_str()) {
            debug!(?payload, "Tap is not for the stats notification.");
            return Ok(TapOutcome::Ignored);
        }
        let Some(navigator) = &self.navigator else {
            warn!("Stats notification tapped, but no diagnostics navigator is registered.");
            return Ok(TapOutcome::Ignored);
        };
        navigator
            .open_diagnostics()
            .map_err(NotifierError::Navigation)?;
        info!("Opened diagnostics viewer from notification tap.");
        Ok(TapOutcome::Opened)
    }
}
