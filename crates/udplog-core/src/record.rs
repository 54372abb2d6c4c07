// SPDX-License-Identifier: Apache-2.0

//! Structured log record decoding and level classification.
//!
//! A decompressed payload is UTF-8 JSON describing one log record. Fields
//! the display format needs are required and their absence is a decode
//! failure; everything else is optional and only degrades rendering.

use std::fmt;

use serde::Deserialize;

use crate::errors::DecodeError;

/// One decoded log record, as shipped by the sender.
///
/// Immutable once decoded; `receive_counter` is the only field filled in
/// locally (by the pipeline, in raw arrival order).
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    /// Log-level bitmask, see [`LogLevel`].
    #[serde(default)]
    pub flag: Option<u64>,
    pub tag: RecordTag,
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
    pub function: String,
    pub file: String,
    pub line: u64,
    pub message: String,
    /// Local arrival ordinal, independent of the sender's `tag.counter`.
    #[serde(skip)]
    pub receive_counter: u64,
}

/// Sender-side metadata nested under `tag`.
///
/// `process_id` and `counter` drive continuity tracking and may be
/// absent; the remaining fields are required for display.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordTag {
    #[serde(rename = "processID", default)]
    pub process_id: Option<String>,
    #[serde(rename = "processName")]
    pub process_name: String,
    /// Monotonic per-process sequence number assigned by the sender.
    #[serde(default)]
    pub counter: Option<i64>,
    #[serde(rename = "queueThreadLabel")]
    pub queue_thread_label: String,
    #[serde(rename = "qosName")]
    pub qos_name: String,
    #[serde(rename = "loggingQueueSuspended", default)]
    pub logging_queue_suspended: Option<bool>,
}

/// Thread identifier; senders emit either a number or a label string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ThreadId {
    Num(u64),
    Text(String),
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadId::Num(n) => write!(f, "{n}"),
            ThreadId::Text(s) => f.write_str(s),
        }
    }
}

/// Log level derived from the record's `flag` bitmask.
///
/// Bits are tested lowest first, so a record with several bits set is
/// labeled by the highest-priority one only. An absent flag or an
/// unmatched bit pattern maps to [`LogLevel::Plain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
    Stderr,
    Stdout,
    Plain,
}

impl LogLevel {
    /// Priority order: lower bit value wins.
    const BITS: [(u64, LogLevel); 7] = [
        (1, LogLevel::Error),
        (2, LogLevel::Warning),
        (4, LogLevel::Info),
        (8, LogLevel::Debug),
        (16, LogLevel::Verbose),
        (32, LogLevel::Stderr),
        (64, LogLevel::Stdout),
    ];

    #[must_use]
    pub fn from_flag(flag: Option<u64>) -> Self {
        let Some(flag) = flag else {
            return LogLevel::Plain;
        };
        for (bit, level) in Self::BITS {
            if flag & bit != 0 {
                return level;
            }
        }
        LogLevel::Plain
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Stderr => "STDERR",
            LogLevel::Stdout => "STDOUT",
            LogLevel::Plain => "LOG",
        }
    }
}

impl LogRecord {
    #[must_use]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_flag(self.flag)
    }
}

/// Decodes one decompressed payload into a [`LogRecord`].
///
/// `receive_counter` is the arrival ordinal assigned by the pipeline; it
/// is attached to the record as-is.
pub fn decode(payload: &[u8], receive_counter: u64) -> Result<LogRecord, DecodeError> {
    let text = std::str::from_utf8(payload)?;
    let mut record: LogRecord = serde_json::from_str(text)?;
    record.receive_counter = receive_counter;
    Ok(record)
}
