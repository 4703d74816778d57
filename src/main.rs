//! Diagnotify - live diagnostics notification
//!
//! Reads newline-delimited JSON log entries from stdin and keeps a stats
//! notification, printed to stdout, in sync with them.

use anyhow::Result;
use clap::Parser;
use diagnotify::{
    cli::Cli,
    collector::MemoryLogCollector,
    config::Config,
    core::{DiagnosticsNavigator, LogCollector, LogEntry, NotificationDisplay},
    global,
    notification::console::ConsoleDisplay,
    service::StatsNotifier,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries the notifications, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        init_tracing("info");
        error!("Failed to load configuration: {:#}", err);
        std::process::exit(1);
    });

    init_tracing(&config.log_level);

    info!("Diagnotify starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Debounce: {}ms", config.notifier.debounce.as_millis());
    info!("Notification Id: {}", config.notifier.notification_id);
    info!("Title: {}", config.notifier.title);
    info!("Max Line Length: {}", config.notifier.max_line_length);
    info!("Channel: {} ({:?})", config.notifier.channel.id, config.notifier.channel.importance);
    info!("Clear On Stop: {}", config.notifier.clear_on_stop);
    info!("Collector Capacity: {}", config.collector.capacity);
    info!("-------------------------------------------------------");

    let collector = MemoryLogCollector::new(config.collector.capacity);
    let display: Arc<dyn NotificationDisplay> = Arc::new(ConsoleDisplay::stdout());
    // There is no viewer to open from a terminal; taps are only logged.
    let navigator: Arc<dyn DiagnosticsNavigator> = Arc::new(|| -> Result<()> {
        info!("Diagnostics viewer requested.");
        Ok(())
    });

    global::initialize(
        StatsNotifier::builder(config.notifier.clone())
            .display(display)
            .navigator(navigator),
    )
    .await?;
    global::start(collector.subscribe()).await?;

    info!("Diagnotify initialized successfully. Reading log entries from stdin...");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_number = 0usize;
    let interrupted = loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Shutting down gracefully...");
                break true;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("Stdin closed after {} lines.", line_number);
                        break false;
                    }
                    Err(e) => {
                        error!("Failed to read from stdin: {}", e);
                        break false;
                    }
                };
                line_number += 1;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<LogEntry>(&line) {
                    Ok(entry) => {
                        debug!(line = line_number, "Recorded {}", entry.summary());
                        collector.record(entry);
                    }
                    Err(e) => warn!(line = line_number, "Skipping malformed log entry: {}", e),
                }
            }
        }
    };

    if interrupted {
        global::stop().await?;
    } else {
        // Dropping the collector ends the stream, which flushes the last update.
        drop(collector);
        global::finish().await?;
    }
    global::dispose().await;

    info!("All tasks shut down. Exiting.");
    Ok(())
}
