//! # Config Model
//!
//! Parses the text format described in spec.md §6.1: a lookbehind line, a
//! lookahead line, then `FROM<TAB>TO` pair lines, with blank lines splitting a
//! file into multiple configs (a "multi-config" file). This module never
//! touches a filesystem - `@listfile` expansion (spec.md §6.2) reads other
//! files, so it lives in the infrastructure layer; see
//! [`list_file_reference`] for the one piece of that logic that is pure text
//! handling and belongs here.

use crate::error::{ReplError, Result};
use crate::escapes::{decode_escapes, encode_escapes};

/// A single `from -> to` substitution, as declared in a config file.
///
/// Both `from` and `to` are guaranteed non-empty by [`Config::parse_multi`]
/// (spec.md §3 invariant 1) - empty-byte-string pairs are rejected at parse
/// time rather than checked again at every use site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementPair {
    pub from: Vec<u8>,
    pub to: Vec<u8>,
}

impl ReplacementPair {
    pub fn new(from: Vec<u8>, to: Vec<u8>) -> Self {
        Self { from, to }
    }
}

/// One stage's worth of configuration: the lookbehind/lookahead anchors and
/// the ordered replacement pairs that make up a single `from -> to` mapping.
///
/// `name` has no effect on codec semantics; it exists purely so diagnostics
/// and the losslessness probe's output files (spec.md §4.10) can say which
/// source config a pair came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub name: String,
    pub lookbehind: String,
    pub lookahead: String,
    pub pairs: Vec<ReplacementPair>,
}

impl Config {
    /// Parses a multi-config byte stream (spec.md §4.2/§6.1) into zero or more
    /// `Config`s. `names` seeds the auto-generated name for each config found
    /// (`"{names}#{index}"`); pass the source file name, or any label useful
    /// for diagnostics.
    pub fn parse_multi(data: &[u8], label: &str) -> Result<Vec<Config>> {
        let normalized = normalize_crlf(data);
        let mut configs = Vec::new();
        let mut lines = normalized.split(|&b| b == b'\n');

        let mut index = 0usize;
        loop {
            let Some(lb_line) = lines.next() else {
                break;
            };
            let lookbehind = String::from_utf8_lossy(lb_line).into_owned();
            // A missing lookahead line (input ends right after the
            // lookbehind line) degenerates to a no-op anchor rather than an
            // error - it only ever matters for a trailing, pair-less config,
            // which gets discarded below anyway.
            let lookahead = lines.next().map(|l| String::from_utf8_lossy(l).into_owned()).unwrap_or_default();

            // A blank line is only a config terminator once at least one pair
            // has been collected; before that it is just a tab-less
            // "comment" line and gets skipped like any other.
            let mut pairs = Vec::new();
            loop {
                match lines.next() {
                    None => break,
                    Some(line) => {
                        if let Some(tab_pos) = line.iter().position(|&b| b == b'\t') {
                            let from = decode_escapes(&line[..tab_pos]);
                            let to = decode_escapes(&line[tab_pos + 1..]);
                            if from.is_empty() || to.is_empty() {
                                return Err(ReplError::parse(format!(
                                    "{label}: config #{index} has a pair with an empty side"
                                )));
                            }
                            pairs.push(ReplacementPair::new(from, to));
                        } else if line.is_empty() && !pairs.is_empty() {
                            break;
                        }
                        // Tab-less, non-terminating lines are comments; skip.
                    }
                }
            }

            if !pairs.is_empty() {
                configs.push(Config {
                    name: format!("{label}#{index}"),
                    lookbehind,
                    lookahead,
                    pairs,
                });
            }
            index += 1;
        }

        Ok(configs)
    }

    /// `true` if `arg` names a list file (`@path`) rather than a config file,
    /// per spec.md §6.2. Returns the bare path with the `@` stripped.
    pub fn list_file_reference(arg: &str) -> Option<&str> {
        arg.strip_prefix('@')
    }

    /// Checks the precondition every traverser of a config set relies on
    /// (spec.md §4.11/§7: "Empty pair set in any traversed config is
    /// fatal"). `parse_multi` already discards zero-pair sub-configs as it
    /// parses, so the only way an empty pair set reaches here is a config
    /// file (or `@listfile`) that resolved to zero configs at all - a
    /// comments-only file, an empty file, or an empty list - which this
    /// rejects the same way a single `Config` with zero pairs would be.
    pub fn ensure_traversable(configs: &[Config]) -> Result<()> {
        if configs.is_empty() {
            return Err(ReplError::empty_config_unnamed());
        }
        for config in configs {
            if config.pairs.is_empty() {
                return Err(ReplError::empty_config(config.name.clone()));
            }
        }
        Ok(())
    }

    /// Renders `configs` back to the multi-config text format (spec.md
    /// §6.1), one blank line between configs. Used by the losslessness probe
    /// to write its lossy/lossless split files; also handy for round-trip
    /// tests.
    pub fn render_multi(configs: &[Config]) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, config) in configs.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(config.lookbehind.as_bytes());
            out.push(b'\n');
            out.extend_from_slice(config.lookahead.as_bytes());
            out.push(b'\n');
            for pair in &config.pairs {
                out.extend_from_slice(&encode_escapes(&pair.from));
                out.push(b'\t');
                out.extend_from_slice(&encode_escapes(&pair.to));
                out.push(b'\n');
            }
        }
        out
    }
}

fn normalize_crlf(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\r' && data.get(i + 1) == Some(&b'\n') {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out
}
