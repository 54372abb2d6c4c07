// SPDX-License-Identifier: Apache-2.0

//! Decode pipeline for the encrypted UDP log stream.
//!
//! Each incoming datagram carries one log record, encrypted with
//! AES-256-GCM, gzip-compressed, and JSON-encoded. This crate turns a raw
//! datagram into a validated [`LogRecord`] plus a [`ContinuityEvent`]
//! describing how the record relates to its predecessor (sequence gaps,
//! process switches). The transport is lossy UDP: loss is detected and
//! reported, never recovered.
//!
//! The crate does no I/O. Sockets, terminal rendering, and file capture
//! live in the server binary; the boundary is [`Pipeline::process`],
//! which takes raw bytes and returns a [`Decoded`] value, or a
//! [`PipelineFailure`] pairing the classified [`DecodeError`] with any
//! bytes recovered before the failing stage.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod codec;
pub mod continuity;
pub mod errors;
pub mod inflate;
pub mod pipeline;
pub mod record;

pub use codec::AeadCodec;
pub use continuity::{ContinuityEvent, ContinuityState, CounterGap, ProcessSwitch};
pub use errors::DecodeError;
pub use pipeline::{Decoded, Pipeline, PipelineFailure};
pub use record::{LogLevel, LogRecord, RecordTag, ThreadId};
