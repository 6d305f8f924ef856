//! # Matcher
//!
//! The codec is explicitly byte-oriented (spec.md Non-goals: no Unicode
//! semantics), but the only engine in the Rust ecosystem with the arbitrary
//! lookbehind/lookahead this codec needs (`fancy-regex`) only matches `&str`.
//! This module bridges the two: every byte is mapped to the Unicode
//! codepoint of the same numeric value (a latin-1-style bijection), so a
//! `from`/`to` key that contains high bytes still round-trips exactly, and a
//! lookaround fragment that wants to match a literal byte `>= 0x80` does so
//! with the `\x{HH}` escape `fancy-regex` already understands.
//!
//! Codepoints 0x00-0x7F encode to one UTF-8 byte, 0x80-0xFF to two, so a
//! match's `str`-byte offsets do not equal original byte offsets in general.
//! [`EncodedBytes`] keeps the char-boundary table needed to translate between
//! the two, and [`match_spans_from`] does the left-to-right,
//! zero-length-advancing scan (spec.md §4.4) entirely in original-byte
//! coordinates so the rest of the domain never has to think about the
//! encoding at all.

use crate::error::{ReplError, Result};

/// A byte string together with the lookup table needed to translate
/// `fancy_regex` match offsets (UTF-8 byte offsets into the synthetic string)
/// back into original byte indices.
pub struct EncodedBytes {
    text: String,
    /// `char_starts[k]` is the UTF-8 byte offset of the `k`-th original byte
    /// in `text`; `char_starts[len]` is `text.len()`.
    char_starts: Vec<usize>,
}

impl EncodedBytes {
    pub fn new(bytes: &[u8]) -> Self {
        let mut text = String::with_capacity(bytes.len());
        let mut char_starts = Vec::with_capacity(bytes.len() + 1);
        for &b in bytes {
            char_starts.push(text.len());
            text.push(b as char);
        }
        char_starts.push(text.len());
        Self { text, char_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of original bytes encoded.
    pub fn len(&self) -> usize {
        self.char_starts.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Translates a UTF-8 byte offset (as returned by a `fancy_regex::Match`)
    /// into the original byte index. Match boundaries always land on a char
    /// boundary, so this always succeeds for offsets the regex engine hands
    /// back.
    fn original_index(&self, utf8_offset: usize) -> usize {
        self.char_starts
            .binary_search(&utf8_offset)
            .expect("regex match boundary did not land on a byte boundary")
    }

    /// The UTF-8 offset of the original byte one past `orig_index`, or the
    /// end of the string if `orig_index` is the last byte. Used to force
    /// progress past a zero-length match by exactly one original byte.
    fn boundary_after(&self, orig_index: usize) -> usize {
        self.char_starts[(orig_index + 1).min(self.char_starts.len() - 1)]
    }

    /// The UTF-8 offset corresponding to original byte index `orig_index`.
    fn utf8_offset(&self, orig_index: usize) -> usize {
        self.char_starts[orig_index]
    }
}

/// A left-to-right, non-overlapping match span, in original byte
/// coordinates: `[start, end)`.
pub type Span = (usize, usize);

/// Scans `enc` with `pattern`, starting the search at original byte offset
/// `start_from`, yielding all non-overlapping matches left to right exactly
/// as spec.md §4.4 describes: leftmost, anchors evaluated at `start`, and a
/// zero-length match forces a one-byte advance so the scan always
/// terminates.
pub fn match_spans_from(pattern: &fancy_regex::Regex, enc: &EncodedBytes, start_from: usize) -> Result<Vec<Span>> {
    let mut spans = Vec::new();
    let mut cursor = enc.utf8_offset(start_from.min(enc.len()));
    loop {
        if cursor > enc.text.len() {
            break;
        }
        match pattern.find_from_pos(&enc.text, cursor)? {
            None => break,
            Some(m) => {
                let orig_start = enc.original_index(m.start());
                let orig_end = enc.original_index(m.end());
                spans.push((orig_start, orig_end));
                cursor = if m.end() > m.start() {
                    m.end()
                } else {
                    enc.boundary_after(orig_end)
                };
            }
        }
    }
    Ok(spans)
}

/// Scans the whole string from the start; equivalent to
/// `match_spans_from(pattern, enc, 0)`.
pub fn match_spans(pattern: &fancy_regex::Regex, enc: &EncodedBytes) -> Result<Vec<Span>> {
    match_spans_from(pattern, enc, 0)
}

/// Compiles a stage pattern string into a `fancy_regex::Regex`, translating
/// compile failures into `ReplError::Compile` (spec.md §4.11: malformed
/// regex is fatal).
pub fn compile(pattern: &str) -> Result<fancy_regex::Regex> {
    fancy_regex::Regex::new(pattern).map_err(|e| ReplError::compile(format!("{pattern}: {e}")))
}

/// Slices `enc`'s original bytes back out of a span. Used wherever a matched
/// key needs to be looked up in the forward/inverse map.
pub fn slice<'a>(original: &'a [u8], span: Span) -> &'a [u8] {
    &original[span.0..span.1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_alt(keys: &[&str]) -> fancy_regex::Regex {
        let pattern = format!("({})", keys.join("|"));
        compile(&pattern).unwrap()
    }

    #[test]
    fn finds_non_overlapping_matches_left_to_right() {
        let re = compile_alt(&["abc"]);
        let enc = EncodedBytes::new(b"zabcyabc");
        let spans = match_spans(&re, &enc).unwrap();
        assert_eq!(spans, vec![(1, 4), (5, 8)]);
    }

    #[test]
    fn zero_length_match_advances_one_byte() {
        let re = compile("x?").unwrap();
        let enc = EncodedBytes::new(b"ab");
        let spans = match_spans(&re, &enc).unwrap();
        // "x?" matches the empty string at every position; with forced
        // advance we see one zero-length match per original byte plus EOF.
        assert_eq!(spans, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn round_trips_high_bytes_through_the_encoding() {
        let bytes = vec![0x00u8, 0x80, 0xff, 0x41];
        let enc = EncodedBytes::new(&bytes);
        assert_eq!(enc.len(), 4);
        let re = compile("\\x{ff}").unwrap();
        let spans = match_spans(&re, &enc).unwrap();
        assert_eq!(spans, vec![(2, 3)]);
        assert_eq!(slice(&bytes, spans[0]), &[0xff]);
    }

    #[test]
    fn lookaround_respects_anchors() {
        // only 'x' between digits matches
        let re = compile("(?<=\\d)(x)(?=\\d)").unwrap();
        let enc = EncodedBytes::new(b"1x2 x y3x4");
        let spans = match_spans(&re, &enc).unwrap();
        assert_eq!(spans, vec![(1, 2), (8, 9)]);
    }

    #[test]
    fn scan_from_offset_skips_earlier_matches() {
        let re = compile_alt(&["a"]);
        let enc = EncodedBytes::new(b"aaa");
        let spans = match_spans_from(&re, &enc, 1).unwrap();
        assert_eq!(spans, vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn malformed_pattern_is_a_compile_error() {
        assert!(compile("(unclosed").is_err());
    }
}
