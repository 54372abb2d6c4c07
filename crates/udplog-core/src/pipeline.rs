// SPDX-License-Identifier: Apache-2.0

//! Per-datagram orchestration: decrypt → inflate → decode → classify.

use tracing::trace;

use crate::codec::AeadCodec;
use crate::continuity::{ContinuityEvent, ContinuityState};
use crate::errors::DecodeError;
use crate::inflate::inflate;
use crate::record::{self, LogRecord};

/// Output of one successful pipeline pass.
#[derive(Debug)]
pub struct Decoded {
    pub record: LogRecord,
    pub event: ContinuityEvent,
    /// Raw decompressed JSON bytes, for raw-capture collaborators.
    pub payload: Vec<u8>,
}

/// One failed pipeline pass: the classified error plus whatever bytes
/// had been recovered by the time the stage failed.
///
/// Decode-stage failures happen after decryption and inflation succeed,
/// so the offending decompressed payload is still available to
/// raw-capture collaborators; earlier stages recover nothing.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct PipelineFailure {
    #[source]
    pub error: DecodeError,
    pub payload: Option<Vec<u8>>,
}

impl PipelineFailure {
    fn early(error: DecodeError) -> Self {
        PipelineFailure {
            error,
            payload: None,
        }
    }
}

/// The per-datagram decode pipeline.
///
/// Owns all cross-datagram state: the AEAD key, continuity tracking, and
/// the local receive counter. Datagrams must be fed in arrival order by a
/// single caller; a failed datagram leaves no partial state behind, with
/// one exception: the receive counter advances as soon as the decoder
/// stage is reached, so arrival ordinals account for records that fail
/// structural validation too.
pub struct Pipeline {
    codec: AeadCodec,
    state: ContinuityState,
    receive_counter: u64,
}

impl Pipeline {
    #[must_use]
    pub fn new(key: &[u8; 32]) -> Self {
        Pipeline {
            codec: AeadCodec::new(key),
            state: ContinuityState::default(),
            receive_counter: 0,
        }
    }

    /// Runs one datagram end-to-end.
    ///
    /// Any stage failure short-circuits; the error's
    /// [`stage()`](DecodeError::stage) names where. Failures are
    /// per-datagram and never poison the pipeline for the next one.
    pub fn process(&mut self, datagram: &[u8]) -> Result<Decoded, PipelineFailure> {
        let plaintext = self
            .codec
            .decrypt(datagram)
            .map_err(PipelineFailure::early)?;
        let payload = inflate(&plaintext).map_err(PipelineFailure::early)?;

        // Arrival ordinal advances before validation so that undecodable
        // payloads still occupy a slot.
        self.receive_counter += 1;
        let record = match record::decode(&payload, self.receive_counter) {
            Ok(record) => record,
            Err(error) => {
                return Err(PipelineFailure {
                    error,
                    payload: Some(payload),
                })
            }
        };

        let event = self.state.classify(&record.tag);
        trace!(
            "decoded record {} ({} raw bytes, counter {:?})",
            record.receive_counter,
            payload.len(),
            record.tag.counter
        );
        Ok(Decoded {
            record,
            event,
            payload,
        })
    }

    /// Number of datagrams that reached the decoder stage so far.
    #[must_use]
    pub fn receive_counter(&self) -> u64 {
        self.receive_counter
    }
}
