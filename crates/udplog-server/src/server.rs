// SPDX-License-Identifier: Apache-2.0

//! UDP receive loop feeding the decode pipeline.
//!
//! Datagrams are handed to the pipeline one at a time, in arrival order,
//! from a single task; continuity tracking and the receive counter depend
//! on that ordering.

use std::io;
use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};
use udplog_core::{Decoded, Pipeline, PipelineFailure};

/// Receive buffer size; matches the sender's maximum datagram size.
const BUFFER_SIZE: usize = 65536;

/// Where to bind the listening socket.
pub struct ServerConfig {
    /// Local hostname or IP, e.g. `::` for any.
    pub host: String,
    /// UDP port, e.g. 5555.
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// UDP server decoding each received datagram through a [`Pipeline`].
pub struct LogReceiver {
    socket: UdpSocket,
    pipeline: Pipeline,
    cancel_token: CancellationToken,
}

impl LogReceiver {
    pub async fn bind(
        config: &ServerConfig,
        key: &[u8; 32],
        cancel_token: CancellationToken,
    ) -> Result<LogReceiver, ServerError> {
        let addr = format!("{}:{}", config.host, config.port);
        let socket = UdpSocket::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(LogReceiver {
            socket,
            pipeline: Pipeline::new(key),
            cancel_token,
        })
    }

    /// Address the socket actually bound to (useful with port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receives datagrams until cancelled, handing each decode outcome to
    /// `handle`.
    ///
    /// Failures are logged with their stage and never end the loop; they
    /// are still handed over so collaborators can capture the offending
    /// payload of a record that failed validation. Only a socket error
    /// ends the loop.
    pub async fn run<F>(mut self, mut handle: F) -> io::Result<()>
    where
        F: FnMut(Result<Decoded, PipelineFailure>),
    {
        let mut buf = vec![0u8; BUFFER_SIZE];
        loop {
            let (len, src) = tokio::select! {
                result = self.socket.recv_from(&mut buf) => result?,
                () = self.cancel_token.cancelled() => return Ok(()),
            };
            trace!("received {} byte datagram from {}", len, src);
            match self.pipeline.process(&buf[..len]) {
                Ok(decoded) => handle(Ok(decoded)),
                Err(failure) => {
                    warn!(
                        "dropping {} byte datagram from {}: {} stage: {}",
                        len,
                        src,
                        failure.error.stage(),
                        failure.error
                    );
                    handle(Err(failure));
                }
            }
        }
    }
}
