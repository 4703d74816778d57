pub mod test_metrics;

use diagnotify::config::NotifierConfig;
use std::time::Duration;

/// Notifier defaults with the given debounce window.
pub fn notifier_config(debounce: Duration) -> NotifierConfig {
    NotifierConfig {
        debounce,
        ..NotifierConfig::default()
    }
}
