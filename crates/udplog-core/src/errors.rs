// SPDX-License-Identifier: Apache-2.0

use std::str::Utf8Error;

/// Per-datagram decode failures.
///
/// Every variant is an expected, recoverable condition: the offending
/// datagram is logged and dropped, and the receive loop moves on to the
/// next one. None of these are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Frame too short to hold the 12-byte IV and 16-byte tag.
    #[error("malformed frame: {len} bytes, need at least 28 for iv and tag")]
    MalformedFrame { len: usize },

    /// GCM tag verification failed: tampering, corruption, or wrong key.
    #[error("authentication failed: GCM tag mismatch")]
    AuthenticationFailed,

    /// Corrupt or truncated gzip stream, bad header, or checksum mismatch.
    #[error("decompression failed: {0}")]
    DecompressionFailed(#[source] std::io::Error),

    /// Decompressed payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] Utf8Error),

    /// Payload is not well-formed JSON or lacks a required field.
    #[error("invalid record structure: {0}")]
    InvalidStructure(#[from] serde_json::Error),
}

impl DecodeError {
    /// Pipeline stage where the failure occurred, for diagnostics.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MalformedFrame { .. } | Self::AuthenticationFailed => "decrypt",
            Self::DecompressionFailed(_) => "inflate",
            Self::InvalidEncoding(_) | Self::InvalidStructure(_) => "decode",
        }
    }
}
