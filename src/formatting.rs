// src/formatting.rs

use crate::snapshot::NotificationSnapshot;
use crate::stats::LogStats;
use std::borrow::Cow;

/// Appended to text that was cut short.
pub const ELLIPSIS: char = '…';

const LABEL_WIDTH: usize = 9;

/// A trait for turning a snapshot into notification text.
pub trait TextFormatter: Send + Sync {
    fn format_title(&self, stats: &LogStats) -> String;
    fn format_body(&self, snapshot: &NotificationSnapshot) -> String;
}

/// Fixed-width, digit-aligned summary of the log stats.
///
/// ```text
/// Total     42
/// HTTP      30  2xx 25 · 3xx  0 · 4xx  3 · 5xx  1 · err  0 · pend  1
/// Messages  12  err  2 · warn  3 · info  7 · dbg  0
/// Last      GET /api/users → 200 (35 ms)
/// ```
pub struct SummaryFormatter {
    title: String,
    max_line_length: usize,
}

impl SummaryFormatter {
    pub fn new(title: impl Into<String>, max_line_length: usize) -> Self {
        Self {
            title: title.into(),
            max_line_length,
        }
    }

    fn format_row(label: &str, count: usize, width: usize) -> String {
        format!("{:<label$} {:>width$}", label, count, label = LABEL_WIDTH, width = width)
    }

    fn format_breakdown(parts: &[(&str, usize)], width: usize) -> String {
        parts
            .iter()
            .map(|(label, count)| format!("{} {:>width$}", label, count, width = width))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

impl TextFormatter for SummaryFormatter {
    fn format_title(&self, stats: &LogStats) -> String {
        format!(
            "{} · {} · {}",
            self.title,
            plural(stats.http.total, "request"),
            plural(stats.error_count(), "error")
        )
    }

    fn format_body(&self, snapshot: &NotificationSnapshot) -> String {
        let stats = &snapshot.stats;
        // Every count is bounded by the total, so its width aligns all columns.
        let width = digits(stats.total);

        let mut http_parts = vec![
            ("2xx", stats.http.success),
            ("3xx", stats.http.redirect),
            ("4xx", stats.http.client_error),
            ("5xx", stats.http.server_error),
            ("err", stats.http.failed),
            ("pend", stats.http.pending),
        ];
        if stats.http.other > 0 {
            http_parts.push(("other", stats.http.other));
        }
        let message_parts = [
            ("err", stats.messages.error),
            ("warn", stats.messages.warning),
            ("info", stats.messages.info),
            ("dbg", stats.messages.debug),
        ];

        let mut lines = vec![
            Self::format_row("Total", stats.total, width),
            format!(
                "{}  {}",
                Self::format_row("HTTP", stats.http.total, width),
                Self::format_breakdown(&http_parts, width)
            ),
            format!(
                "{}  {}",
                Self::format_row("Messages", stats.messages.total, width),
                Self::format_breakdown(&message_parts, width)
            ),
        ];

        if let Some(summary) = &snapshot.last_summary {
            lines.push(format!(
                "{:<label$} {}",
                "Last",
                truncate_with_ellipsis(summary, self.max_line_length),
                label = LABEL_WIDTH
            ));
        }

        lines.join("\n")
    }
}

/// Shortens `text` to at most `max_len` characters, ending in an ellipsis
/// when anything was removed.
pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_len {
        return Cow::Borrowed(text);
    }
    if max_len == 0 {
        return Cow::Owned(String::new());
    }
    let kept: String = text.chars().take(max_len - 1).collect();
    let mut out = kept.trim_end().to_string();
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
