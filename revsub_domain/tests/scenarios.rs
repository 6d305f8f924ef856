//! End-to-end scenarios S1-S6, exercised through the public crate API rather
//! than a single module's internals - these are the fixtures spec.md §8 names
//! explicitly, run once more here as a cross-module integration check.

use revsub_domain::config::{Config, ReplacementPair};
use revsub_domain::flagstream::MemoryFlagStream;
use revsub_domain::pipeline::Pipeline;

fn config(name: &str, lookbehind: &str, lookahead: &str, pairs: &[(&[u8], &[u8])]) -> Config {
    Config {
        name: name.to_string(),
        lookbehind: lookbehind.to_string(),
        lookahead: lookahead.to_string(),
        pairs: pairs.iter().map(|(f, t)| ReplacementPair::new(f.to_vec(), t.to_vec())).collect(),
    }
}

fn bits(stream: &MemoryFlagStream) -> String {
    stream.records().iter().map(|r| if r.bit { '1' } else { '0' }).collect()
}

#[test]
fn s1_simple_substitution() {
    let cfg = config("s1", "", "", &[(b"abc", b"X")]);
    let pipeline = Pipeline::compile(&[cfg]).unwrap();

    let mut sink = MemoryFlagStream::new();
    let transformed = pipeline.encode(b"zabcyabc", &mut sink).unwrap();
    assert_eq!(transformed, b"zXyX");
    assert_eq!(bits(&sink), "11");

    let mut source = MemoryFlagStream::from_bits(sink.records().iter().map(|r| r.bit));
    let (restored, eof_count) = pipeline.decode(&transformed, &mut source).unwrap();
    assert_eq!(eof_count, 0);
    assert_eq!(restored, b"zabcyabc");
}

#[test]
fn s2_ambiguous_inverse() {
    let cfg = config("s2", "", "", &[(b"cat", b"bat")]);
    let pipeline = Pipeline::compile(&[cfg]).unwrap();

    let mut sink = MemoryFlagStream::new();
    let transformed = pipeline.encode(b"catbat", &mut sink).unwrap();
    assert_eq!(transformed, b"batbat");
    assert_eq!(bits(&sink), "10");

    let mut source = MemoryFlagStream::from_bits(sink.records().iter().map(|r| r.bit));
    let (restored, _) = pipeline.decode(&transformed, &mut source).unwrap();
    assert_eq!(restored, b"catbat");
}

#[test]
fn s3_length_descending() {
    let cfg = config("s3", "", "", &[(b"a", b"1"), (b"ab", b"2")]);
    let pipeline = Pipeline::compile(&[cfg]).unwrap();

    let mut sink = MemoryFlagStream::new();
    let transformed = pipeline.encode(b"ab", &mut sink).unwrap();
    assert_eq!(transformed, b"2");
    assert_eq!(bits(&sink), "1");
}

#[test]
fn s4_two_stage_pipeline() {
    let stage0 = config("stage0", "", "", &[(b"foo", b"bar")]);
    let stage1 = config("stage1", "", "", &[(b"bar", b"baz")]);
    let pipeline = Pipeline::compile(&[stage0, stage1]).unwrap();

    let mut sink = MemoryFlagStream::new();
    let transformed = pipeline.encode(b"foo bar", &mut sink).unwrap();
    assert_eq!(transformed, b"baz baz");
    // stage1's flags ("11") are emitted before stage0's ("10").
    assert_eq!(bits(&sink), "1110");

    let mut source = MemoryFlagStream::from_bits(sink.records().iter().map(|r| r.bit));
    let (restored, eof_count) = pipeline.decode(&transformed, &mut source).unwrap();
    assert_eq!(eof_count, 0);
    assert_eq!(restored, b"foo bar");
}

#[test]
fn s5_anchors() {
    let cfg = config("s5", "\\d", "\\d", &[(b"x", b"_")]);
    let pipeline = Pipeline::compile(&[cfg]).unwrap();

    let mut sink = MemoryFlagStream::new();
    let transformed = pipeline.encode(b"1x2 x y3x4", &mut sink).unwrap();
    assert_eq!(transformed, b"1_2 x y3_4");
    assert_eq!(bits(&sink), "11");
}

#[test]
fn s6_losslessness_probe() {
    let cfg = config("s6", "", "", &[(b"cat", b"bat")]);
    let report = revsub_domain::lossless::probe(&[cfg], b"catbat").unwrap();
    assert_eq!(report.lossless.len(), 0);
    assert_eq!(report.lossy.len(), 1);
    assert_eq!(report.lossy[0].pairs[0].from, b"cat");
}

#[test]
fn list_file_style_concatenation_preserves_order() {
    // Two config "files", each multi-config, concatenated in listing order -
    // mirrors what the infrastructure layer's @listfile expansion hands the
    // pipeline (spec.md §4.2/§6.2), even though this crate never reads a file
    // itself.
    let file_a = Config::parse_multi(b"\n\nfoo\tbar\n", "a.cfg").unwrap();
    let file_b = Config::parse_multi(b"\n\nbar\tbaz\n", "b.cfg").unwrap();
    let mut configs = Vec::new();
    configs.extend(file_a);
    configs.extend(file_b);

    let pipeline = Pipeline::compile(&configs).unwrap();
    let mut sink = MemoryFlagStream::new();
    let transformed = pipeline.encode(b"foo bar", &mut sink).unwrap();
    assert_eq!(transformed, b"baz baz");
}
