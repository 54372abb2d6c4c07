// SPDX-License-Identifier: Apache-2.0

//! Sequence-continuity tracking across the reconstructed log stream.
//!
//! Datagrams arrive independently and may be lost; the sender's
//! per-process `counter` lets us notice. Each decoded record is compared
//! against the previous one to detect counter gaps and process switches,
//! then the state advances. There is exactly one writer: the pipeline,
//! one record at a time.

use crate::record::RecordTag;

/// Running state for the lifetime of one pipeline.
#[derive(Debug, Default)]
pub struct ContinuityState {
    last_counter: Option<i64>,
    last_process_id: Option<String>,
}

/// The sending process changed between two consecutive records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSwitch {
    pub from: String,
    pub to: String,
}

/// The sender's counter did not advance by exactly one.
///
/// `missing` is negative when the counter moved backward, e.g. after a
/// process restart; that is a reportable condition, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterGap {
    pub from: i64,
    pub to: i64,
    pub missing: i64,
}

/// Classification of one record against its predecessor.
///
/// Both disruptions can fire on the same record. Both `None` means the
/// record follows normally, or carries no tracking fields at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContinuityEvent {
    pub process_switch: Option<ProcessSwitch>,
    pub counter_gap: Option<CounterGap>,
}

impl ContinuityEvent {
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.process_switch.is_none() && self.counter_gap.is_none()
    }
}

impl ContinuityState {
    /// Classifies `tag` against the previous record, then advances state.
    ///
    /// Records lacking `processID` or `counter` are not tracked: no event
    /// is reported and the state stays untouched, so a stretch of
    /// untracked records neither triggers nor resets gap detection.
    pub fn classify(&mut self, tag: &RecordTag) -> ContinuityEvent {
        let (Some(process_id), Some(counter)) = (tag.process_id.as_ref(), tag.counter) else {
            return ContinuityEvent::default();
        };

        let mut event = ContinuityEvent::default();
        if let Some(last) = self.last_process_id.as_deref() {
            if last != process_id.as_str() {
                event.process_switch = Some(ProcessSwitch {
                    from: last.to_string(),
                    to: process_id.clone(),
                });
            }
        }
        if let Some(last) = self.last_counter {
            // Sender counters are untrusted; saturate at the i64 extremes
            // instead of overflowing.
            if last.checked_add(1) != Some(counter) {
                event.counter_gap = Some(CounterGap {
                    from: last,
                    to: counter,
                    missing: counter.saturating_sub(last).saturating_sub(1),
                });
            }
        }

        self.last_process_id = Some(process_id.clone());
        self.last_counter = Some(counter);
        event
    }
}
