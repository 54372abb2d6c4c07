// SPDX-License-Identifier: Apache-2.0

//! File sinks for the rendered log and the raw payload capture.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Plaintext copy of the rendered log stream, one line per record.
pub struct LogSink<W: Write> {
    writer: W,
}

impl LogSink<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(LogSink::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> LogSink<W> {
    pub fn new(writer: W) -> Self {
        LogSink { writer }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Raw capture of decompressed payloads.
///
/// Each payload is framed as a 4-byte big-endian length followed by the
/// payload bytes, so the capture can be replayed record by record.
pub struct RawSink<W: Write> {
    writer: W,
}

impl RawSink<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(RawSink::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> RawSink<W> {
    pub fn new(writer: W) -> Self {
        RawSink { writer }
    }

    pub fn write_payload(&mut self, payload: &[u8]) -> io::Result<()> {
        let len = u32::try_from(payload.len())
            .map_err(|_| io::Error::other("payload too large for 32-bit framing"))?;
        self.writer.write_all(&len.to_be_bytes())?;
        self.writer.write_all(payload)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sink_appends_newline() {
        let mut sink = LogSink::new(Vec::new());
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        assert_eq!(sink.writer, b"first\nsecond\n");
    }

    #[test]
    fn test_raw_sink_length_prefix() {
        let mut sink = RawSink::new(Vec::new());
        sink.write_payload(b"{\"a\":1}").unwrap();
        assert_eq!(&sink.writer[..4], &7u32.to_be_bytes());
        assert_eq!(&sink.writer[4..], b"{\"a\":1}");
    }

    #[test]
    fn test_raw_sink_empty_payload() {
        let mut sink = RawSink::new(Vec::new());
        sink.write_payload(b"").unwrap();
        assert_eq!(sink.writer, 0u32.to_be_bytes());
    }
}
