// SPDX-License-Identifier: Apache-2.0

use sha2::{Digest, Sha256};

/// Derives the 256-bit AEAD key from the shared passphrase.
///
/// Plain SHA-256 over the passphrase bytes, matching the sender. No
/// salting or stretching is applied.
#[must_use]
pub fn derive_key(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}
