//! # Encode Simulator
//!
//! The hard part (spec.md §4.6). Forward substitution is unambiguous, but
//! deciding how to *undo* it is not: a `to` string may already have been
//! present in the original, so for every position where `intermediate`
//! matches the backward pattern, the encoder must decide whether that
//! occurrence is a genuine replacement to revert or a natural collision to
//! leave alone, and record the decision as one flag bit.
//!
//! The naive way to decide is to maintain a simulated buffer that starts as
//! a copy of `intermediate` and mutate it in place as each revert is
//! applied, then track an index map back to `original`. This module instead
//! keeps a scalar `cumulative_delta` and a skip-cursor `next_valid_int_pos`:
//! because every applied revert only ever shifts positions by a constant
//! amount on the unprocessed suffix, the mapping from an `intermediate`
//! position to the position it corresponds to in `original` is linear on
//! each segment, and the O(1) update in step 6 below is exactly that linear
//! function's derivative.

use crate::error::Result;
use crate::flagstream::{FlagRecord, FlagSink};
use crate::matcher::{self, EncodedBytes};
use crate::stage::CompiledStage;

/// Replays the inverse substitution of `stage` over `(original,
/// intermediate)`, writing one [`FlagRecord`] per retained inverse-match
/// decision to `sink`, in the exact order spec.md §4.7's decode replay will
/// later consume them for this stage.
pub fn simulate<S: FlagSink>(original: &[u8], intermediate: &[u8], stage: &CompiledStage, sink: &mut S) -> Result<()> {
    let enc = EncodedBytes::new(intermediate);
    let spans = matcher::match_spans(stage.backward_pattern(), &enc)?;

    let mut cumulative_delta: i64 = 0;
    let mut next_valid_int_pos: usize = 0;

    for (int_pos, int_end) in spans {
        // Step 2: a match inside an already-reverted region has already
        // been accounted for and must not be revisited.
        if int_pos < next_valid_int_pos {
            continue;
        }

        // Step 3: sim_pos is where int_pos corresponds to in `original`,
        // given every revert decision made so far.
        let sim_pos = (int_pos as i64 + cumulative_delta).max(0) as usize;
        let matched = &intermediate[int_pos..int_end];
        let repl = stage.inverse_map().get(matched);

        // Step 4: the decision.
        let bit = match repl {
            Some(repl) => {
                sim_pos + repl.len() <= original.len() && &original[sim_pos..sim_pos + repl.len()] == repl.as_slice()
            }
            None => false,
        };

        // Step 5.
        sink.write(&FlagRecord::with_context(bit, intermediate, int_pos, int_end))
            .map_err(|e| crate::error::ReplError::io(e.to_string()))?;

        // Step 6.
        if bit {
            let repl_len = repl.expect("bit is only true when repl is Some").len() as i64;
            cumulative_delta += repl_len - (int_end - int_pos) as i64;
            next_valid_int_pos = int_end;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ReplacementPair};
    use crate::flagstream::MemoryFlagStream;

    fn config(pairs: &[(&[u8], &[u8])]) -> Config {
        Config {
            name: "t".to_string(),
            lookbehind: String::new(),
            lookahead: String::new(),
            pairs: pairs.iter().map(|(f, t)| ReplacementPair::new(f.to_vec(), t.to_vec())).collect(),
        }
    }

    fn bits(stream: &MemoryFlagStream) -> Vec<bool> {
        stream.records().iter().map(|r| r.bit).collect()
    }

    #[test]
    fn s1_simple_substitution() {
        let stage = CompiledStage::compile(&config(&[(b"abc", b"X")])).unwrap();
        let original = b"zabcyabc";
        let transformed = stage.forward(original).unwrap();
        assert_eq!(transformed, b"zXyX");

        let mut sink = MemoryFlagStream::new();
        simulate(original, &transformed, &stage, &mut sink).unwrap();
        assert_eq!(bits(&sink), vec![true, true]);
    }

    #[test]
    fn s2_ambiguous_inverse() {
        let stage = CompiledStage::compile(&config(&[(b"cat", b"bat")])).unwrap();
        let original = b"catbat";
        let transformed = stage.forward(original).unwrap();
        assert_eq!(transformed, b"batbat");

        let mut sink = MemoryFlagStream::new();
        simulate(original, &transformed, &stage, &mut sink).unwrap();
        assert_eq!(bits(&sink), vec![true, false]);
    }

    #[test]
    fn s3_length_descending() {
        let stage = CompiledStage::compile(&config(&[(b"a", b"1"), (b"ab", b"2")])).unwrap();
        let original = b"ab";
        let transformed = stage.forward(original).unwrap();
        assert_eq!(transformed, b"2");

        let mut sink = MemoryFlagStream::new();
        simulate(original, &transformed, &stage, &mut sink).unwrap();
        assert_eq!(bits(&sink), vec![true]);
    }

    #[test]
    fn s5_anchors() {
        let cfg = Config {
            name: "t".into(),
            lookbehind: "\\d".into(),
            lookahead: "\\d".into(),
            pairs: vec![ReplacementPair::new(b"x".to_vec(), b"_".to_vec())],
        };
        let stage = CompiledStage::compile(&cfg).unwrap();
        let original = b"1x2 x y3x4";
        let transformed = stage.forward(original).unwrap();
        assert_eq!(transformed, b"1_2 x y3_4");

        let mut sink = MemoryFlagStream::new();
        simulate(original, &transformed, &stage, &mut sink).unwrap();
        assert_eq!(bits(&sink), vec![true, true]);
    }

    #[test]
    fn flag_count_matches_retained_and_rejected_matches() {
        let stage = CompiledStage::compile(&config(&[(b"cat", b"bat")])).unwrap();
        let original = b"catbatbatcat";
        let transformed = stage.forward(original).unwrap();
        let mut sink = MemoryFlagStream::new();
        simulate(original, &transformed, &stage, &mut sink).unwrap();
        // every "bat" in the transformed string produces one decision
        let expected_matches = matcher::match_spans(stage.backward_pattern(), &EncodedBytes::new(&transformed)).unwrap().len();
        assert_eq!(sink.records().len(), expected_matches);
    }
}
