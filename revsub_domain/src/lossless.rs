//! # Losslessness Probe
//!
//! Tests each replacement pair in isolation against a reference corpus
//! (spec.md §4.10). A pair is lossless with respect to data `D` if forward
//! substitution followed by the *greedy* inverse (every ambiguous match
//! forced to "revert") reconstructs `D` exactly. The probe never touches the
//! input configs; it only classifies each pair and hands back two filtered
//! copies - one lossy-only, one lossless-only - grouped by source config so
//! the caller can write them out as two separate multi-config files.

use crate::config::Config;
use crate::decode::replay;
use crate::error::Result;
use crate::flagstream::{FlagSource, MatchContext};
use crate::stage::CompiledStage;

/// A flag source that always answers "revert" - the greedy inverse spec.md
/// §4.10 defines the probe against.
struct AlwaysRevert;

impl FlagSource for AlwaysRevert {
    type Error = std::convert::Infallible;

    fn read(&mut self, _ctx: MatchContext<'_>) -> std::result::Result<Option<bool>, Self::Error> {
        Ok(Some(true))
    }

    fn close(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// The result of classifying every pair in a set of configs against one
/// reference corpus: two config lists, each preserving the source configs'
/// `name`/`lookbehind`/`lookahead` but restricted to the pairs that
/// classified lossless (resp. lossy). A source config with no pairs in
/// either bucket contributes nothing to that bucket's list.
pub struct ProbeReport {
    pub lossless: Vec<Config>,
    pub lossy: Vec<Config>,
}

/// Classifies a single pair, sharing the given lookbehind/lookahead, against
/// `data`. A pair with `from == to` is trivially lossless (spec.md §4.10) -
/// no byte ever moves, so there is nothing to invert.
fn is_lossless(lookbehind: &str, lookahead: &str, from: &[u8], to: &[u8], data: &[u8]) -> Result<bool> {
    if from == to {
        return Ok(true);
    }
    let probe_config = Config {
        name: "probe".to_string(),
        lookbehind: lookbehind.to_string(),
        lookahead: lookahead.to_string(),
        pairs: vec![crate::config::ReplacementPair::new(from.to_vec(), to.to_vec())],
    };
    let stage = CompiledStage::compile(&probe_config)?;
    let transformed = stage.forward(data)?;
    let mut source = AlwaysRevert;
    let (restored, _) = replay(&transformed, &stage, &mut source)?;
    Ok(restored == data)
}

/// Runs the probe over every pair in `configs` against `data`.
pub fn probe(configs: &[Config], data: &[u8]) -> Result<ProbeReport> {
    Config::ensure_traversable(configs)?;

    let mut lossless = Vec::new();
    let mut lossy = Vec::new();

    for config in configs {
        let mut lossless_pairs = Vec::new();
        let mut lossy_pairs = Vec::new();
        for pair in &config.pairs {
            if is_lossless(&config.lookbehind, &config.lookahead, &pair.from, &pair.to, data)? {
                lossless_pairs.push(pair.clone());
            } else {
                lossy_pairs.push(pair.clone());
            }
        }
        if !lossless_pairs.is_empty() {
            lossless.push(Config {
                name: config.name.clone(),
                lookbehind: config.lookbehind.clone(),
                lookahead: config.lookahead.clone(),
                pairs: lossless_pairs,
            });
        }
        if !lossy_pairs.is_empty() {
            lossy.push(Config {
                name: config.name.clone(),
                lookbehind: config.lookbehind.clone(),
                lookahead: config.lookahead.clone(),
                pairs: lossy_pairs,
            });
        }
    }

    Ok(ProbeReport { lossless, lossy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacementPair;

    fn config(pairs: &[(&[u8], &[u8])]) -> Config {
        Config {
            name: "t".to_string(),
            lookbehind: String::new(),
            lookahead: String::new(),
            pairs: pairs.iter().map(|(f, t)| ReplacementPair::new(f.to_vec(), t.to_vec())).collect(),
        }
    }

    #[test]
    fn s6_ambiguous_pair_is_lossy() {
        let configs = vec![config(&[(b"cat", b"bat")])];
        let report = probe(&configs, b"catbat").unwrap();
        assert_eq!(report.lossless.len(), 0);
        assert_eq!(report.lossy.len(), 1);
        assert_eq!(report.lossy[0].pairs[0].from, b"cat");
    }

    #[test]
    fn unambiguous_pair_is_lossless() {
        let configs = vec![config(&[(b"abc", b"X")])];
        let report = probe(&configs, b"zabcyabc").unwrap();
        assert_eq!(report.lossless.len(), 1);
        assert_eq!(report.lossy.len(), 0);
    }

    #[test]
    fn identity_pair_is_trivially_lossless() {
        let configs = vec![config(&[(b"same", b"same")])];
        let report = probe(&configs, b"xsamey").unwrap();
        assert_eq!(report.lossless.len(), 1);
        assert_eq!(report.lossy.len(), 0);
    }

    #[test]
    fn mixed_pairs_split_across_both_buckets() {
        let configs = vec![config(&[(b"abc", b"X"), (b"cat", b"bat")])];
        let report = probe(&configs, b"zabcyabc catbat").unwrap();
        assert_eq!(report.lossless.len(), 1);
        assert_eq!(report.lossless[0].pairs.len(), 1);
        assert_eq!(report.lossy.len(), 1);
        assert_eq!(report.lossy[0].pairs.len(), 1);
    }

    #[test]
    fn rejects_an_empty_config_set() {
        assert!(probe(&[], b"catbat").is_err());
    }

    #[test]
    fn rejects_a_config_with_zero_pairs() {
        let bare = Config { name: "bare".into(), lookbehind: String::new(), lookahead: String::new(), pairs: vec![] };
        let err = probe(&[bare], b"catbat").unwrap_err();
        assert_eq!(err.category(), "empty");
    }
}
