// SPDX-License-Identifier: Apache-2.0

//! gzip-container decompression of decrypted payloads.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::errors::DecodeError;

/// Inflates one gzip-framed payload.
///
/// The transport bounds the compressed input at 64 KiB; the decompressed
/// output is not explicitly capped.
pub fn inflate(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(DecodeError::DecompressionFailed)?;
    Ok(decompressed)
}
