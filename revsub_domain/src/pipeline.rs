//! # Pipeline
//!
//! A `Pipeline` is configs in listing order (spec.md §3, §4.8). Encoding
//! feeds each stage's output to the next and, because a multi-stage decode
//! walks the stages in reverse, emits the per-stage flag records in reverse
//! stage order too - last stage's decisions first. Decoding simply runs each
//! stage's replay against a single shared flag source in that same reverse
//! order, so the bits a reverse-order decode consumes line up with the
//! reverse-order encode that produced them.

use crate::config::Config;
use crate::encode::simulate;
use crate::error::Result;
use crate::flagstream::{FlagSink, FlagSource, MemoryFlagStream};
use crate::stage::CompiledStage;

pub struct Pipeline {
    stages: Vec<CompiledStage>,
}

impl Pipeline {
    pub fn compile(configs: &[Config]) -> Result<Self> {
        Config::ensure_traversable(configs)?;
        let stages = configs.iter().map(CompiledStage::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self { stages })
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Runs every stage forward in listing order, then writes every stage's
    /// flag records to `sink` in reverse stage order (spec.md §4.8 step 3).
    pub fn encode<S: FlagSink>(&self, input: &[u8], sink: &mut S) -> Result<Vec<u8>> {
        let mut current = input.to_vec();
        let mut per_stage_flags = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let next = stage.forward(&current)?;
            let mut stage_flags = MemoryFlagStream::new();
            simulate(&current, &next, stage, &mut stage_flags)?;
            per_stage_flags.push(stage_flags);
            current = next;
        }

        for stage_flags in per_stage_flags.into_iter().rev() {
            for record in stage_flags.records() {
                sink.write(record).map_err(|e| crate::error::ReplError::io(e.to_string()))?;
            }
        }
        sink.close().map_err(|e| crate::error::ReplError::io(e.to_string()))?;

        Ok(current)
    }

    /// Runs every stage's decode replay in reverse stage order against a
    /// single shared flag source, recovering the original input. Returns the
    /// total count of decisions that defaulted to `0` because the flag
    /// source ran out (spec.md §4.11).
    pub fn decode<So: FlagSource>(&self, input: &[u8], source: &mut So) -> Result<(Vec<u8>, usize)> {
        let mut current = input.to_vec();
        let mut eof_total = 0usize;

        for stage in self.stages.iter().rev() {
            let (restored, eof_count) = crate::decode::replay(&current, stage, source)?;
            eof_total += eof_count;
            current = restored;
        }
        source.close().map_err(|e| crate::error::ReplError::io(e.to_string()))?;

        Ok((current, eof_total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacementPair;

    fn config(name: &str, pairs: &[(&[u8], &[u8])]) -> Config {
        Config {
            name: name.to_string(),
            lookbehind: String::new(),
            lookahead: String::new(),
            pairs: pairs.iter().map(|(f, t)| ReplacementPair::new(f.to_vec(), t.to_vec())).collect(),
        }
    }

    #[test]
    fn s4_two_stage_pipeline_reverses_flag_order() {
        let stage0 = config("stage0", &[(b"foo", b"bar")]);
        let stage1 = config("stage1", &[(b"bar", b"baz")]);
        let pipeline = Pipeline::compile(&[stage0, stage1]).unwrap();

        let mut sink = MemoryFlagStream::new();
        let transformed = pipeline.encode(b"foo bar", &mut sink).unwrap();
        assert_eq!(transformed, b"baz baz");

        let bits: Vec<bool> = sink.records().iter().map(|r| r.bit).collect();
        // stage1 flags ("11") emitted before stage0 flags ("10").
        assert_eq!(bits, vec![true, true, true, false]);
    }

    #[test]
    fn two_stage_pipeline_round_trips() {
        let stage0 = config("stage0", &[(b"foo", b"bar")]);
        let stage1 = config("stage1", &[(b"bar", b"baz")]);
        let pipeline = Pipeline::compile(&[stage0, stage1]).unwrap();

        let mut sink = MemoryFlagStream::new();
        let transformed = pipeline.encode(b"foo bar", &mut sink).unwrap();

        let mut source = MemoryFlagStream::from_bits(sink.records().iter().map(|r| r.bit));
        let (restored, eof_count) = pipeline.decode(&transformed, &mut source).unwrap();
        assert_eq!(eof_count, 0);
        assert_eq!(restored, b"foo bar");
    }

    #[test]
    fn single_stage_pipeline_is_equivalent_to_bare_stage() {
        let stage = config("only", &[(b"abc", b"X")]);
        let pipeline = Pipeline::compile(&[stage]).unwrap();
        let mut sink = MemoryFlagStream::new();
        let transformed = pipeline.encode(b"zabcyabc", &mut sink).unwrap();
        assert_eq!(transformed, b"zXyX");

        let mut source = MemoryFlagStream::from_bits(sink.records().iter().map(|r| r.bit));
        let (restored, _) = pipeline.decode(&transformed, &mut source).unwrap();
        assert_eq!(restored, b"zabcyabc");
    }

    #[test]
    fn compile_rejects_an_empty_config_set() {
        assert!(Pipeline::compile(&[]).is_err());
    }

    #[test]
    fn compile_rejects_a_config_with_zero_pairs() {
        let bare = config("bare", &[]);
        let err = Pipeline::compile(&[bare]).unwrap_err();
        assert_eq!(err.category(), "empty");
    }
}
