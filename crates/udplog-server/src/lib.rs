// SPDX-License-Identifier: Apache-2.0

//! Server side of the encrypted UDP log stream: CLI, key derivation,
//! socket loop, terminal rendering, and file capture. The decode pipeline
//! itself lives in `udplog-core`.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod cli;
pub mod display;
pub mod key;
pub mod server;
pub mod sink;

/// Default diagnostic log level when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
