// SPDX-License-Identifier: Apache-2.0

//! End-to-end test: encrypted, compressed records sent over a real UDP
//! socket come out of the receiver as decoded records with continuity
//! annotations.

use std::io::Write;

use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

use udplog_core::{DecodeError, Decoded, PipelineFailure};
use udplog_server::key::derive_key;
use udplog_server::server::{LogReceiver, ServerConfig};
use udplog_server::sink::RawSink;

const PASSPHRASE: &str = "integration-test-passphrase";

fn record_json(process_id: &str, counter: i64, message: &str) -> Vec<u8> {
    serde_json::json!({
        "timestamp": "2024-05-04 11:22:33:444",
        "flag": 4,
        "tag": {
            "processID": process_id,
            "processName": "appclient",
            "counter": counter,
            "queueThreadLabel": "im.client.receiveQueue",
            "qosName": "UTILITY",
        },
        "threadID": "0x16bc0f000",
        "function": "-[Connection processInput:]",
        "file": "/build/src/classes/Connection.m",
        "line": 912,
        "message": message,
    })
    .to_string()
    .into_bytes()
}

fn seal_datagram(payload: &[u8], iv_seed: u8) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).expect("gzip write");
    let compressed = encoder.finish().expect("gzip finish");

    let key = derive_key(PASSPHRASE);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let iv = [iv_seed; 12];
    let mut ciphertext = compressed;
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&iv), b"", &mut ciphertext)
        .expect("encrypt");

    let mut datagram = iv.to_vec();
    datagram.extend_from_slice(&tag);
    datagram.extend_from_slice(&ciphertext);
    datagram
}

type Outcome = Result<Decoded, PipelineFailure>;

async fn recv_outcome(rx: &mut mpsc::UnboundedReceiver<Outcome>) -> Outcome {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for decode outcome")
        .expect("receiver channel closed")
}

async fn recv_decoded(rx: &mut mpsc::UnboundedReceiver<Outcome>) -> Decoded {
    recv_outcome(rx).await.expect("expected a decoded record")
}

#[tokio::test]
async fn receiver_decodes_stream_and_tracks_continuity() {
    let cancel_token = CancellationToken::new();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let receiver = LogReceiver::bind(&config, &derive_key(PASSPHRASE), cancel_token.clone())
        .await
        .expect("bind receiver");
    let server_addr = receiver.local_addr().expect("local addr");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let server = tokio::spawn(receiver.run(move |outcome| {
        let _ = tx.send(outcome);
    }));

    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind sender");

    socket
        .send_to(&seal_datagram(&record_json("A", 4, "first"), 1), server_addr)
        .await
        .expect("send first");
    let first = recv_decoded(&mut rx).await;
    assert_eq!(first.record.message, "first");
    assert_eq!(first.record.receive_counter, 1);
    assert!(first.event.is_normal());

    // A tampered datagram is dropped without killing the loop or
    // consuming a receive slot; nothing was recovered, so there is no
    // payload to capture.
    let mut tampered = seal_datagram(&record_json("A", 5, "tampered"), 2);
    *tampered.last_mut().unwrap() ^= 0x01;
    socket
        .send_to(&tampered, server_addr)
        .await
        .expect("send tampered");
    let failure = recv_outcome(&mut rx).await.expect_err("expected a failure");
    assert!(matches!(failure.error, DecodeError::AuthenticationFailed));
    assert_eq!(failure.payload, None);

    // A well-encrypted but structurally invalid payload is handed over
    // with its decompressed bytes, so the raw capture still records it.
    socket
        .send_to(&seal_datagram(b"{\"unrelated\": true}", 9), server_addr)
        .await
        .expect("send invalid record");
    let failure = recv_outcome(&mut rx).await.expect_err("expected a failure");
    assert!(matches!(failure.error, DecodeError::InvalidStructure(_)));
    let payload = failure.payload.expect("payload should survive validation failure");
    assert_eq!(payload, b"{\"unrelated\": true}");

    let mut capture = RawSink::new(Vec::new());
    capture.write_payload(&payload).expect("raw capture write");
    let captured = capture.into_inner();
    assert_eq!(&captured[..4], &19u32.to_be_bytes());
    assert_eq!(&captured[4..], b"{\"unrelated\": true}");

    socket
        .send_to(&seal_datagram(&record_json("B", 7, "second"), 3), server_addr)
        .await
        .expect("send second");
    // The invalid record above consumed receive slot 2; the tampered
    // datagram consumed none.
    let second = recv_decoded(&mut rx).await;
    assert_eq!(second.record.message, "second");
    assert_eq!(second.record.receive_counter, 3);

    let switch = second.event.process_switch.expect("process switch");
    assert_eq!(switch.from, "A");
    assert_eq!(switch.to, "B");
    let gap = second.event.counter_gap.expect("counter gap");
    assert_eq!((gap.from, gap.to, gap.missing), (4, 7, 2));

    cancel_token.cancel();
    timeout(Duration::from_secs(5), server)
        .await
        .expect("server shutdown timed out")
        .expect("server task panicked")
        .expect("receive loop failed");
}
