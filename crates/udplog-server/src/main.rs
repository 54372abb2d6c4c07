// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use udplog_server::cli::Cli;
use udplog_server::display::{self, Style};
use udplog_server::server::{LogReceiver, ServerConfig};
use udplog_server::sink::{LogSink, RawSink};
use udplog_server::{key, DEFAULT_LOG_LEVEL};

fn print_line(line: &str, style: Style, color: bool) {
    if color {
        println!("{}", display::colorize(line, style));
    } else {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout carries only the log stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let key = key::derive_key(&cli.key);
    let color = !cli.no_color;

    let mut log_sink = match &cli.file {
        Some(path) => match LogSink::create(path) {
            Ok(sink) => {
                info!("opening logfile '{}' for writing", path.display());
                Some(sink)
            }
            Err(e) => {
                error!("unable to open logfile '{}': {}", path.display(), e);
                return;
            }
        },
        None => None,
    };
    let mut raw_sink = match &cli.rawfile {
        Some(path) => match RawSink::create(path) {
            Ok(sink) => {
                info!("opening RAW logfile '{}' for writing", path.display());
                Some(sink)
            }
            Err(e) => {
                error!("unable to open RAW logfile '{}': {}", path.display(), e);
                return;
            }
        },
        None => None,
    };

    let config = ServerConfig {
        host: cli.listen.clone(),
        port: cli.port,
    };
    let receiver = match LogReceiver::bind(&config, &key, CancellationToken::new()).await {
        Ok(receiver) => receiver,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    info!("listening on {}:{}", cli.listen, cli.port);

    let result = receiver
        .run(|outcome| {
            let decoded = match outcome {
                Ok(decoded) => decoded,
                Err(failure) => {
                    // Payloads that failed validation still go to the raw
                    // capture; the receive loop has already logged them.
                    if let (Some(sink), Some(payload)) =
                        (raw_sink.as_mut(), failure.payload.as_deref())
                    {
                        if let Err(e) = sink.write_payload(payload) {
                            error!("RAW logfile write failed: {e}");
                        }
                    }
                    return;
                }
            };

            if let Some(notice) = display::format_event(&decoded.event) {
                if let Some(sink) = log_sink.as_mut() {
                    if let Err(e) = sink.write_line(&notice) {
                        error!("logfile write failed: {e}");
                    }
                }
                print_line(&notice, display::NOTICE_STYLE, color);
            }

            if let Some(sink) = raw_sink.as_mut() {
                if let Err(e) = sink.write_payload(&decoded.payload) {
                    error!("RAW logfile write failed: {e}");
                }
            }

            let line = display::format_record(&decoded.record);
            if let Some(sink) = log_sink.as_mut() {
                if let Err(e) = sink.write_line(&line) {
                    error!("logfile write failed: {e}");
                }
            }
            print_line(&line, display::level_style(decoded.record.level()), color);
        })
        .await;

    if let Err(e) = result {
        error!("receive loop failed: {e}");
    }
}
