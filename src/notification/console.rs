//! A display that prints notifications to the console.
//!
//! Used by the `diagnotify` binary and handy for debugging a host
//! integration without a device.

use crate::core::NotificationDisplay;
use crate::notification::{NotificationChannel, NotificationRequest};
use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// Writes each notification update as a framed block.
pub struct ConsoleDisplay<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleDisplay {
    /// A display writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Consumes the display and returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_block(&self, lines: &[String]) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("console writer lock poisoned"))?;
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send + 'static> NotificationDisplay for ConsoleDisplay<W> {
    async fn create_channel(&self, channel: &NotificationChannel) -> Result<()> {
        info!(id = %channel.id, name = %channel.name, importance = ?channel.importance, "Notification channel created.");
        Ok(())
    }

    #[instrument(skip_all, fields(id = request.id))]
    async fn show(&self, request: &NotificationRequest) -> Result<()> {
        debug!("Printing notification to console.");
        let mut lines = vec![
            format!("┌ #{} [{}] {}", request.id, request.timestamp.format("%H:%M:%S"), request.title),
        ];
        lines.extend(request.body.lines().map(|line| format!("│ {}", line)));
        lines.push("└".to_string());
        self.write_block(&lines)
    }

    async fn cancel(&self, id: i32) -> Result<()> {
        self.write_block(&[format!("✕ #{} cleared", id)])
    }
}
