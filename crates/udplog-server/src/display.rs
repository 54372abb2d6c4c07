// SPDX-License-Identifier: Apache-2.0

//! Terminal rendering of decoded records and continuity notices.
//!
//! The line format mirrors what the sending application prints to its own
//! console, so a reconstructed stream reads like the original log.

use std::path::Path;

use udplog_core::{ContinuityEvent, LogLevel, LogRecord};

/// ANSI-256 palette entry for one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: u8,
    pub bg: Option<u8>,
}

/// White-on-black, used for continuity notices and startup messages.
pub const NOTICE_STYLE: Style = Style {
    fg: 15,
    bg: Some(0),
};

#[must_use]
pub fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error => Style { fg: 9, bg: Some(0) },
        LogLevel::Warning => Style {
            fg: 208,
            bg: Some(0),
        },
        LogLevel::Info => Style { fg: 40, bg: None },
        LogLevel::Debug => Style { fg: 39, bg: None },
        LogLevel::Verbose => Style { fg: 7, bg: None },
        LogLevel::Stderr => Style { fg: 9, bg: None },
        LogLevel::Stdout | LogLevel::Plain => Style { fg: 0, bg: None },
    }
}

/// Wraps `text` in ANSI-256 color escape sequences.
#[must_use]
pub fn colorize(text: &str, style: Style) -> String {
    match style.bg {
        Some(bg) => format!("\x1b[38;5;{}m\x1b[48;5;{}m{}\x1b[0m", style.fg, bg, text),
        None => format!("\x1b[38;5;{}m{}\x1b[0m", style.fg, text),
    }
}

/// Renders one decoded record as a single log line.
#[must_use]
pub fn format_record(record: &LogRecord) -> String {
    let tag = &record.tag;
    let thread = record.thread_id.to_string();
    let thread_label = if thread == tag.queue_thread_label {
        thread
    } else {
        format!("{}:{}", thread, tag.queue_thread_label)
    };
    let suspended = if tag.logging_queue_suspended == Some(true) {
        "+++ LOG_QUEUE_DISABLED +++ "
    } else {
        ""
    };
    let counter = tag
        .counter
        .map(|c| format!("{c}: "))
        .unwrap_or_default();

    format!(
        "{}{}{} [{:>6}] {} [{} (QOS:{})] {} at {}:{}: {}",
        suspended,
        counter,
        record.timestamp,
        record.level().as_ref(),
        tag.process_name,
        thread_label,
        tag.qos_name,
        record.function,
        short_path(&record.file),
        record.line,
        record.message,
    )
}

/// Renders a continuity disruption, or `None` for a normal record.
#[must_use]
pub fn format_event(event: &ContinuityEvent) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(switch) = &event.process_switch {
        parts.push(format!(
            "PROCESS SWITCH FROM {} TO {}",
            switch.from, switch.to
        ));
    }
    if let Some(gap) = &event.counter_gap {
        parts.push(format!(
            "counter jumped from {} to {} leaving out {} lines",
            gap.from, gap.to, gap.missing
        ));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(": "))
    }
}

/// Shortens a source path to its last two components.
fn short_path(file: &str) -> String {
    let path = Path::new(file);
    let name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    match path.parent().and_then(Path::file_name) {
        Some(parent) => format!("{}/{}", parent.to_string_lossy(), name),
        None => name,
    }
}
