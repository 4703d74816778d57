//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged with
//! the configuration from the `diagnotify.toml` file and environment variables.

use clap::Parser;
use figment::{
    value::{Dict, Map},
    Error, Figment, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Shows a live notification summarizing diagnostics log entries read from stdin.
///
/// Each stdin line is one JSON log entry, for example
/// `{"kind":"http","id":1,"method":"GET","url":"/api","state":{"outcome":"completed","status":200}}`.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debounce window in milliseconds (0 renders every update).
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Maximum length of the "last entry" line.
    #[arg(long, value_name = "CHARS")]
    pub max_line_length: Option<usize>,

    /// Title prefix of the notification.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Logging level (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        // Only flags that were given override lower layers.
        let mut figment = Figment::new();

        if let Some(ms) = self.debounce_ms {
            figment = figment.merge(("notifier.debounce_ms", ms));
        }
        if let Some(len) = self.max_line_length {
            figment = figment.merge(("notifier.max_line_length", len));
        }
        if let Some(title) = &self.title {
            figment = figment.merge(("notifier.title", title));
        }
        if let Some(level) = &self.log_level {
            figment = figment.merge(("log_level", level));
        }

        figment.data()
    }
}
