//! # Flag-Stream Adapter
//!
//! The domain decides one bit per ambiguous inverse match; where that bit
//! goes is deliberately none of its business (spec.md §4.9: "an external
//! collaborator"). This module defines the port - [`FlagSink`] /
//! [`FlagSource`] - and the [`FlagRecord`] shape those ports move. Concrete
//! backends (a plain ASCII file, a dynamically loaded entropy coder) live in
//! the infrastructure layer of the `revsub` crate, behind these traits.

/// Default left/right context width, in bytes, captured around a match
/// (spec.md §3 invariant 4).
pub const CTX_BEFORE: usize = 32;
pub const CTX_AFTER: usize = 32;

/// One decision, with enough context for an external model to make use of
/// it. `context` is `CTX_BEFORE` bytes of left context, the matched bytes,
/// and `CTX_AFTER` bytes of right context, truncated (never padded) at the
/// edges of the source string; `ctx_offset` locates the match start within
/// `context` and `match_len` its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRecord {
    pub bit: bool,
    pub context: Vec<u8>,
    pub ctx_offset: usize,
    pub ctx_len: usize,
    pub match_len: usize,
}

impl FlagRecord {
    /// Builds the context window around `[start, end)` in `source`, per
    /// spec.md §3/§4.11 (truncated at string edges, never padded).
    pub fn with_context(bit: bool, source: &[u8], start: usize, end: usize) -> Self {
        let ctx = MatchContext::around(source, start, end);
        Self {
            bit,
            ctx_offset: ctx.ctx_offset,
            ctx_len: ctx.ctx_len,
            match_len: ctx.match_len,
            context: ctx.bytes.to_vec(),
        }
    }
}

/// The same `(context, ctx_offset, ctx_len, match_len)` quartet a
/// [`FlagRecord`] carries, borrowed rather than owned, handed to
/// [`FlagSource::read`] so a context-aware backend can make its read
/// decision from the same window the matching encode-time write saw
/// (spec.md §4.9/§6.5). Backends that don't care about it - the ASCII file,
/// the in-memory stream - just ignore the field.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub bytes: &'a [u8],
    pub ctx_offset: usize,
    pub ctx_len: usize,
    pub match_len: usize,
}

impl<'a> MatchContext<'a> {
    /// Builds the context window around `[start, end)` in `source`, per
    /// spec.md §3/§4.11 (truncated at string edges, never padded) - the same
    /// windowing [`FlagRecord::with_context`] uses on the write side.
    pub fn around(source: &'a [u8], start: usize, end: usize) -> Self {
        let ctx_start = start.saturating_sub(CTX_BEFORE);
        let ctx_end = (end + CTX_AFTER).min(source.len());
        Self {
            bytes: &source[ctx_start..ctx_end],
            ctx_offset: start - ctx_start,
            ctx_len: ctx_end - ctx_start,
            match_len: end - start,
        }
    }
}

/// A decision sink: written during encode, one record per retained/rejected
/// inverse match, in the order spec.md §4.8 step 3 defines (reverse stage
/// order). `open`/`close` bracket the backend's lifetime (spec.md §5); the
/// adapter is responsible for ensuring `close` runs on every exit path,
/// write and error alike.
pub trait FlagSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write(&mut self, record: &FlagRecord) -> std::result::Result<(), Self::Error>;
    fn close(&mut self) -> std::result::Result<(), Self::Error>;
}

/// A decision source: read during decode, one bit per unseen inverse match.
/// `read` returns `None` at end-of-stream rather than an error - spec.md
/// §4.11 treats flag-source underflow as a non-fatal decision of `0`, a
/// policy the decode replay applies, not this port.
pub trait FlagSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `ctx` is the same context window the encode-time write for this
    /// decision was built from (spec.md §4.9); a plain backend ignores it,
    /// a context-aware one (an external entropy coder) can condition its
    /// read on it the same way the writer conditioned its write.
    fn read(&mut self, ctx: MatchContext<'_>) -> std::result::Result<Option<bool>, Self::Error>;
    fn close(&mut self) -> std::result::Result<(), Self::Error>;
}

/// An in-memory sink/source pair, primarily useful for tests and for the
/// losslessness probe's forced-`1` greedy inverse (spec.md §4.10), which
/// never actually needs a flag stream to persist anywhere.
#[derive(Debug, Default)]
pub struct MemoryFlagStream {
    records: Vec<FlagRecord>,
    read_pos: usize,
}

impl MemoryFlagStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FlagRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FlagRecord> {
        self.records
    }

    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            records: bits
                .into_iter()
                .map(|bit| FlagRecord {
                    bit,
                    context: Vec::new(),
                    ctx_offset: 0,
                    ctx_len: 0,
                    match_len: 0,
                })
                .collect(),
            read_pos: 0,
        }
    }
}

impl FlagSink for MemoryFlagStream {
    type Error = std::convert::Infallible;

    fn write(&mut self, record: &FlagRecord) -> std::result::Result<(), Self::Error> {
        self.records.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

impl FlagSource for MemoryFlagStream {
    type Error = std::convert::Infallible;

    fn read(&mut self, _ctx: MatchContext<'_>) -> std::result::Result<Option<bool>, Self::Error> {
        if self.read_pos >= self.records.len() {
            return Ok(None);
        }
        let bit = self.records[self.read_pos].bit;
        self.read_pos += 1;
        Ok(Some(bit))
    }

    fn close(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_truncates_at_start_of_string() {
        let source = b"hello world";
        let rec = FlagRecord::with_context(true, source, 0, 5);
        assert_eq!(rec.context, b"hello world");
        assert_eq!(rec.ctx_offset, 0);
        assert_eq!(rec.match_len, 5);
    }

    #[test]
    fn context_truncates_at_end_of_string() {
        let source = b"hello world";
        let rec = FlagRecord::with_context(true, source, 6, 11);
        assert_eq!(rec.context, b"hello world");
        assert_eq!(rec.ctx_offset, 6);
    }

    #[test]
    fn context_windows_around_interior_match() {
        let mut source = vec![b'a'; 40];
        source.extend_from_slice(b"MATCH");
        source.extend_from_slice(&vec![b'b'; 40]);
        let rec = FlagRecord::with_context(true, &source, 40, 45);
        assert_eq!(rec.ctx_len, CTX_BEFORE + 5 + CTX_AFTER);
        assert_eq!(rec.ctx_offset, CTX_BEFORE);
        assert_eq!(&rec.context[rec.ctx_offset..rec.ctx_offset + rec.match_len], b"MATCH");
    }

    #[test]
    fn memory_stream_round_trips_bits() {
        let mut stream = MemoryFlagStream::new();
        stream.write(&FlagRecord::with_context(true, b"abc", 0, 1)).unwrap();
        stream.write(&FlagRecord::with_context(false, b"abc", 1, 2)).unwrap();
        stream.close().unwrap();

        let mut reader = MemoryFlagStream::from_bits(stream.into_records().iter().map(|r| r.bit));
        let ctx = MatchContext::around(b"abc", 0, 1);
        assert_eq!(reader.read(ctx).unwrap(), Some(true));
        assert_eq!(reader.read(ctx).unwrap(), Some(false));
        assert_eq!(reader.read(ctx).unwrap(), None);
    }
}
