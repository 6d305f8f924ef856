// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ASCII Flag-Stream Backend
//!
//! The reference flag-stream format (spec.md §6.3): a sequence of ASCII
//! `'0'`/`'1'` bytes, no separators, file length equal to the number of
//! decisions recorded. Always available - this is the default `--backend`.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use revsub_domain::{FlagRecord, FlagSink, FlagSource, MatchContext};

/// Writes the ASCII flag-stream format during encode.
pub struct AsciiFileWriter {
    writer: BufWriter<File>,
}

impl AsciiFileWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self { writer: BufWriter::new(File::create(path)?) })
    }
}

impl FlagSink for AsciiFileWriter {
    type Error = io::Error;

    fn write(&mut self, record: &FlagRecord) -> io::Result<()> {
        self.writer.write_all(&[if record.bit { b'1' } else { b'0' }])
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Reads the ASCII flag-stream format during decode.
pub struct AsciiFileReader {
    reader: BufReader<File>,
}

impl AsciiFileReader {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self { reader: BufReader::new(File::open(path)?) })
    }
}

impl FlagSource for AsciiFileReader {
    type Error = io::Error;

    fn read(&mut self, _ctx: MatchContext<'_>) -> io::Result<Option<bool>> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0] == b'1')),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bit: bool) -> FlagRecord {
        FlagRecord::with_context(bit, b"abc", 0, 1)
    }

    #[test]
    fn write_then_read_round_trips_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.bin");

        let mut writer = AsciiFileWriter::create(&path).unwrap();
        writer.write(&record(true)).unwrap();
        writer.write(&record(false)).unwrap();
        writer.write(&record(true)).unwrap();
        writer.close().unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents, b"101");

        let mut reader = AsciiFileReader::open(&path).unwrap();
        let ctx = MatchContext::around(b"abc", 0, 1);
        assert_eq!(reader.read(ctx).unwrap(), Some(true));
        assert_eq!(reader.read(ctx).unwrap(), Some(false));
        assert_eq!(reader.read(ctx).unwrap(), Some(true));
        assert_eq!(reader.read(ctx).unwrap(), None);
    }

    #[test]
    fn reading_past_eof_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        AsciiFileWriter::create(&path).unwrap().close().unwrap();

        let mut reader = AsciiFileReader::open(&path).unwrap();
        let ctx = MatchContext::around(b"abc", 0, 1);
        assert_eq!(reader.read(ctx).unwrap(), None);
        assert_eq!(reader.read(ctx).unwrap(), None);
    }
}
