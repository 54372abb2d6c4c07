// SPDX-License-Identifier: Apache-2.0

//! AES-256-GCM frame decryption.
//!
//! Every datagram carries a fixed-layout frame: 12-byte IV, 16-byte
//! authentication tag, then the ciphertext. The tag travels detached from
//! the ciphertext, so decryption goes through the detached-tag API. The
//! sender derives the 256-bit key by hashing a shared passphrase; this
//! module only consumes the resulting digest.

use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce, Tag};

use crate::errors::DecodeError;

/// IV length in bytes (96-bit GCM nonce).
pub const IV_LEN: usize = 12;

/// Authentication tag length in bytes (128-bit GCM tag).
pub const TAG_LEN: usize = 16;

/// Smallest well-formed frame: IV and tag around an empty ciphertext.
pub const MIN_FRAME_LEN: usize = IV_LEN + TAG_LEN;

/// Borrowed view of one wire frame: `iv ‖ tag ‖ ciphertext`.
#[derive(Debug)]
pub struct CipherFrame<'a> {
    pub iv: &'a [u8],
    pub tag: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl<'a> CipherFrame<'a> {
    /// Splits a raw datagram into its frame fields.
    ///
    /// A zero-length ciphertext is legal; a frame shorter than IV plus
    /// tag is not.
    pub fn parse(datagram: &'a [u8]) -> Result<Self, DecodeError> {
        if datagram.len() < MIN_FRAME_LEN {
            return Err(DecodeError::MalformedFrame {
                len: datagram.len(),
            });
        }
        let (iv, rest) = datagram.split_at(IV_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);
        Ok(CipherFrame {
            iv,
            tag,
            ciphertext,
        })
    }
}

/// Decrypting codec holding the process-lifetime AEAD key.
pub struct AeadCodec {
    cipher: Aes256Gcm,
}

impl AeadCodec {
    #[must_use]
    pub fn new(key: &[u8; 32]) -> Self {
        AeadCodec {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Decrypts one frame, verifying it against the detached tag.
    ///
    /// Tag verification failing is the only decrypt failure mode; a
    /// verified frame yields exactly the sender's plaintext, which may
    /// be empty.
    pub fn decrypt(&self, datagram: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let frame = CipherFrame::parse(datagram)?;
        let mut plaintext = frame.ciphertext.to_vec();
        self.cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(frame.iv),
                b"",
                &mut plaintext,
                Tag::from_slice(frame.tag),
            )
            .map_err(|_| DecodeError::AuthenticationFailed)?;
        Ok(plaintext)
    }
}
