//! Configuration management for diagnotify
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer defaults, a `diagnotify.toml` file,
//! environment variables and command-line arguments.

use crate::cli::Cli;
use crate::notification::{Importance, NotificationChannel};
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::path::PathBuf;
use std::time::Duration;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "diagnotify.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Configuration for the stats notifier.
    pub notifier: NotifierConfig,
    /// Configuration for the in-memory log collector.
    pub collector: CollectorConfig,
}

/// Configuration for the stats notifier.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotifierConfig {
    /// Quiet period before a burst of log updates is rendered. Zero renders
    /// every emission immediately.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "debounce_ms")]
    pub debounce: Duration,
    /// Stable id of the stats notification.
    pub notification_id: i32,
    /// Prefix of the notification title.
    pub title: String,
    /// Maximum length, in characters, of the "last entry" line.
    pub max_line_length: usize,
    /// Payload attached to the notification and matched on tap.
    pub tap_payload: String,
    /// Remove the notification when the notifier is stopped.
    pub clear_on_stop: bool,
    /// Ask the platform to keep the notification from being dismissed.
    pub ongoing: bool,
    /// The notification channel to create on initialization.
    pub channel: ChannelConfig,
}

/// Configuration for the notification channel.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

/// Configuration for the in-memory log collector.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Maximum number of entries kept; the oldest are evicted first.
    pub capacity: usize,
}

impl Config {
    /// Loads the configuration by layering defaults, the TOML file, the
    /// environment and finally the command-line arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed command-line arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // e.g. DIAGNOTIFY_NOTIFIER__DEBOUNCE_MS=250
            .merge(Env::prefixed("DIAGNOTIFY_").split("__"))
            .merge(cli.clone())
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the notifier cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.notifier.validate()?;
        if self.collector.capacity == 0 {
            bail!("collector.capacity must be at least 1");
        }
        Ok(())
    }
}

impl NotifierConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 {
            bail!("notifier.max_line_length must be at least 1");
        }
        if self.channel.id.trim().is_empty() {
            bail!("notifier.channel.id must not be empty");
        }
        if self.tap_payload.is_empty() {
            bail!("notifier.tap_payload must not be empty");
        }
        Ok(())
    }

    /// The channel description handed to the display on initialization.
    pub fn notification_channel(&self) -> NotificationChannel {
        NotificationChannel {
            id: self.channel.id.clone(),
            name: self.channel.name.clone(),
            description: self.channel.description.clone(),
            importance: self.channel.importance,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            notifier: NotifierConfig::default(),
            collector: CollectorConfig { capacity: 1000 },
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(750),
            notification_id: 4242,
            title: "Diagnostics".to_string(),
            max_line_length: 48,
            tap_payload: "diagnotify://open".to_string(),
            clear_on_stop: true,
            ongoing: true,
            channel: ChannelConfig {
                id: "diagnotify_stats".to_string(),
                name: "Diagnostics".to_string(),
                description: "Live request and log statistics".to_string(),
                importance: Importance::Low,
            },
        }
    }
}
