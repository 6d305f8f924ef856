//! # Compiled Stage
//!
//! A [`Config`] is data; a [`CompiledStage`] is that data turned into
//! something the encoder and decoder can actually run: a forward pattern
//! over the `from` keys, a backward pattern over the `to` keys, and the two
//! maps each match result is looked up in (spec.md §3, §4.3).

use std::collections::HashMap;

use crate::config::Config;
use crate::error::Result;
use crate::matcher::{self, EncodedBytes};
use crate::pattern::{build_alternation, build_stage_pattern};

/// One config, compiled: forward/backward regex plus forward/inverse maps.
pub struct CompiledStage {
    pub name: String,
    forward_pattern: fancy_regex::Regex,
    backward_pattern: fancy_regex::Regex,
    forward_map: HashMap<Vec<u8>, Vec<u8>>,
    inverse_map: HashMap<Vec<u8>, Vec<u8>>,
}

impl CompiledStage {
    /// Compiles `config` into forward/backward patterns and maps.
    ///
    /// `forward_map` keeps the last pair when two pairs share a `from`;
    /// `inverse_map` keeps the first pair when two pairs share a `to` -
    /// spec.md §3's "first occurrence wins" rule for the direction that
    /// cannot otherwise disambiguate.
    pub fn compile(config: &Config) -> Result<Self> {
        let mut forward_map = HashMap::with_capacity(config.pairs.len());
        let mut inverse_map = HashMap::with_capacity(config.pairs.len());
        for pair in &config.pairs {
            forward_map.insert(pair.from.clone(), pair.to.clone());
            inverse_map.entry(pair.to.clone()).or_insert_with(|| pair.from.clone());
        }

        let from_keys: Vec<Vec<u8>> = config.pairs.iter().map(|p| p.from.clone()).collect();
        let to_keys: Vec<Vec<u8>> = inverse_map.keys().cloned().collect();

        let forward_alt = build_alternation(&from_keys);
        let backward_alt = build_alternation(&to_keys);
        let forward_pattern = matcher::compile(&build_stage_pattern(&config.lookbehind, &config.lookahead, &forward_alt))?;
        let backward_pattern =
            matcher::compile(&build_stage_pattern(&config.lookbehind, &config.lookahead, &backward_alt))?;

        Ok(Self {
            name: config.name.clone(),
            forward_pattern,
            backward_pattern,
            forward_map,
            inverse_map,
        })
    }

    pub fn backward_pattern(&self) -> &fancy_regex::Regex {
        &self.backward_pattern
    }

    pub fn inverse_map(&self) -> &HashMap<Vec<u8>, Vec<u8>> {
        &self.inverse_map
    }

    /// Forward stage (spec.md §4.5): walk `original` left to right with the
    /// forward pattern, copying unmatched gaps and substituting `from`
    /// matches with their `to`. No flags are produced - the forward
    /// direction is unambiguous by construction.
    pub fn forward(&self, original: &[u8]) -> Result<Vec<u8>> {
        let enc = EncodedBytes::new(original);
        let spans = matcher::match_spans(&self.forward_pattern, &enc)?;
        let mut out = Vec::with_capacity(original.len());
        let mut last_end = 0usize;
        for (start, end) in spans {
            out.extend_from_slice(&original[last_end..start]);
            let matched = &original[start..end];
            let replacement = self.forward_map.get(matched).map(|v| v.as_slice()).unwrap_or(matched);
            out.extend_from_slice(replacement);
            last_end = end;
        }
        out.extend_from_slice(&original[last_end..]);
        Ok(out)
    }
}
