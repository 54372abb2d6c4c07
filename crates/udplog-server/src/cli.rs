// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::Parser;

/// Receives encrypted log datagrams and renders a readable log stream.
///
/// The encryption key offers no entropy stretching: the passphrase is
/// hashed once with SHA-256, so it must carry proper entropy itself.
#[derive(Parser, Debug)]
#[command(name = "udplog-server", version, about)]
pub struct Cli {
    /// Passphrase the 256-bit AES key is derived from.
    #[arg(short, long, value_name = "KEY")]
    pub key: String,

    /// Local hostname or IP to listen on.
    #[arg(short, long, value_name = "HOSTNAME", default_value = "::")]
    pub listen: String,

    /// Port to listen on.
    #[arg(short, long, value_name = "PORT", default_value_t = 5555)]
    pub port: u16,

    /// Write the rendered log to this file in addition to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Write raw decompressed payloads to this file, length-prefixed.
    #[arg(short, long, value_name = "RAW")]
    pub rawfile: Option<PathBuf>,

    /// Disable ANSI colors on stdout.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["udplog-server", "--key", "hunter2"]);
        assert_eq!(cli.key, "hunter2");
        assert_eq!(cli.listen, "::");
        assert_eq!(cli.port, 5555);
        assert_eq!(cli.file, None);
        assert_eq!(cli.rawfile, None);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from([
            "udplog-server",
            "-k",
            "hunter2",
            "-l",
            "127.0.0.1",
            "-p",
            "7777",
            "-f",
            "out.log",
            "-r",
            "out.raw",
        ]);
        assert_eq!(cli.listen, "127.0.0.1");
        assert_eq!(cli.port, 7777);
        assert_eq!(cli.file, Some(PathBuf::from("out.log")));
        assert_eq!(cli.rawfile, Some(PathBuf::from("out.raw")));
    }

    #[test]
    fn test_key_is_required() {
        assert!(Cli::try_parse_from(["udplog-server"]).is_err());
    }
}
